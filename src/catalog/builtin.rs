//! Static built-in command catalog.
//!
//! Settings pages, tool launchers and auxiliary windows that ship with the
//! launcher itself. Titles are in the product's native language (Chinese);
//! each definition carries aliases so English queries find it too.

use crate::domain::{Action, Category, Icon, Item};

/// Id of the "open toolbox" command.
pub const TOOLBOX_ID: &str = "builtin.toolbox";

/// Where a built-in command leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTarget {
    Route(&'static str),
    Tool(&'static str),
    Window(&'static str),
}

/// Compile-time description of a built-in item.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinDef {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub icon: &'static str,
    pub shortcut: Option<&'static str>,
    pub target: BuiltinTarget,
    /// `(language, phrase)` pairs.
    pub aliases: &'static [(&'static str, &'static str)],
}

pub const DEFINITIONS: &[BuiltinDef] = &[
    BuiltinDef {
        id: "builtin.settings",
        title: "打开设置",
        subtitle: "偏好设置与常规选项",
        icon: "settings",
        shortcut: Some("Ctrl+,"),
        target: BuiltinTarget::Route("/settings"),
        aliases: &[
            ("en", "open settings"),
            ("en", "preferences"),
            ("zh", "设置"),
            ("zh", "偏好"),
        ],
    },
    BuiltinDef {
        id: "builtin.settings.search",
        title: "搜索设置",
        subtitle: "索引目录、排除规则与刷新间隔",
        icon: "search",
        shortcut: None,
        target: BuiltinTarget::Route("/settings/search"),
        aliases: &[
            ("en", "search settings"),
            ("en", "index settings"),
            ("zh", "索引设置"),
        ],
    },
    BuiltinDef {
        id: "builtin.settings.hotkeys",
        title: "快捷键设置",
        subtitle: "全局唤起快捷键",
        icon: "keyboard",
        shortcut: None,
        target: BuiltinTarget::Route("/settings/hotkeys"),
        aliases: &[("en", "hotkey settings"), ("en", "keyboard shortcuts")],
    },
    BuiltinDef {
        id: TOOLBOX_ID,
        title: "打开工具箱",
        subtitle: "浏览全部内置工具",
        icon: "toolbox",
        shortcut: Some("Ctrl+T"),
        target: BuiltinTarget::Route("/tools"),
        aliases: &[
            ("en", "open tools"),
            ("en", "open toolbox"),
            ("en", "toolbox"),
            ("zh", "工具箱"),
        ],
    },
    BuiltinDef {
        id: "builtin.about",
        title: "关于",
        subtitle: "版本信息与更新",
        icon: "info",
        shortcut: None,
        target: BuiltinTarget::Route("/about"),
        aliases: &[("en", "about"), ("en", "check for updates"), ("zh", "版本")],
    },
    BuiltinDef {
        id: "builtin.window.main",
        title: "显示主窗口",
        subtitle: "打开启动器主界面",
        icon: "window",
        shortcut: None,
        target: BuiltinTarget::Window("main"),
        aliases: &[("en", "show main window"), ("en", "open main window")],
    },
    BuiltinDef {
        id: "builtin.window.clipboard",
        title: "剪贴板历史",
        subtitle: "查看最近复制的内容",
        icon: "clipboard",
        shortcut: Some("Ctrl+Shift+V"),
        target: BuiltinTarget::Window("clipboard"),
        aliases: &[("en", "clipboard history"), ("en", "paste history")],
    },
    BuiltinDef {
        id: "builtin.tool.base64",
        title: "Base64 编解码",
        subtitle: "文本与 Base64 互相转换",
        icon: "code",
        shortcut: None,
        target: BuiltinTarget::Tool("base64"),
        aliases: &[("en", "base64 encode"), ("en", "base64 decode")],
    },
    BuiltinDef {
        id: "builtin.tool.json",
        title: "JSON 格式化",
        subtitle: "格式化、压缩与校验 JSON",
        icon: "braces",
        shortcut: None,
        target: BuiltinTarget::Tool("json-formatter"),
        aliases: &[("en", "json formatter"), ("en", "prettify json")],
    },
    BuiltinDef {
        id: "builtin.tool.url",
        title: "URL 编解码",
        subtitle: "百分号编码与解码",
        icon: "link",
        shortcut: None,
        target: BuiltinTarget::Tool("url-codec"),
        aliases: &[("en", "url encode"), ("en", "url decode")],
    },
    BuiltinDef {
        id: "builtin.tool.hash",
        title: "哈希计算",
        subtitle: "MD5 / SHA-1 / SHA-256",
        icon: "hash",
        shortcut: None,
        target: BuiltinTarget::Tool("hash"),
        aliases: &[("en", "hash calculator"), ("en", "checksum")],
    },
    BuiltinDef {
        id: "builtin.tool.timestamp",
        title: "时间戳转换",
        subtitle: "Unix 时间戳与日期互转",
        icon: "clock",
        shortcut: None,
        target: BuiltinTarget::Tool("timestamp"),
        aliases: &[("en", "timestamp converter"), ("en", "unix time")],
    },
    BuiltinDef {
        id: "builtin.tool.uuid",
        title: "UUID 生成",
        subtitle: "生成随机 UUID v4",
        icon: "fingerprint",
        shortcut: None,
        target: BuiltinTarget::Tool("uuid"),
        aliases: &[("en", "uuid generator"), ("en", "generate guid")],
    },
];

impl BuiltinDef {
    #[must_use]
    pub fn action(&self) -> Action {
        match self.target {
            BuiltinTarget::Route(route) => Action::OpenBuiltinRoute {
                route: route.to_string(),
            },
            BuiltinTarget::Tool(tool_id) => Action::OpenBuiltinTool {
                tool_id: tool_id.to_string(),
            },
            BuiltinTarget::Window(label) => Action::OpenBuiltinWindow {
                window_label: label.to_string(),
            },
        }
    }

    #[must_use]
    pub fn to_item(&self) -> Item {
        Item {
            id: self.id.to_string(),
            title: self.title.to_string(),
            subtitle: self.subtitle.to_string(),
            category: Category::Builtin,
            source: Some("builtin".to_string()),
            shortcut: self.shortcut.map(String::from),
            icon: Icon::builtin(self.icon),
            action: self.action(),
        }
    }
}

/// Materializes the whole built-in catalog in declaration order.
#[must_use]
pub fn items() -> Vec<Item> {
    DEFINITIONS.iter().map(BuiltinDef::to_item).collect()
}
