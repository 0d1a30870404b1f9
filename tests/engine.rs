//! End-to-end engine behavior: background builds, settings, concurrency.

use quickdex::catalog::NoApplications;
use quickdex::locale::LocaleResolver;
use quickdex::settings::{JsonSettingsStore, MemorySettingsStore, SettingsStore};
use quickdex::{initialize, Config, SearchEngine, SearchSettings, SearchSettingsUpdate, SettingsChange};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn settings_for(roots: Vec<PathBuf>) -> SearchSettings {
    SearchSettings {
        roots,
        exclude_patterns: vec!["*.tmp".to_string()],
        ..SearchSettings::default()
    }
}

fn start(roots: Vec<PathBuf>) -> SearchEngine {
    SearchEngine::start(
        Box::new(MemorySettingsStore::new(Some(settings_for(roots)))),
        Arc::new(NoApplications),
        LocaleResolver::default(),
    )
    .unwrap()
}

fn write_generation(root: &Path, generation: usize, count: usize) {
    for entry in std::fs::read_dir(root).unwrap() {
        std::fs::remove_file(entry.unwrap().path()).unwrap();
    }
    for i in 0..count {
        std::fs::write(root.join(format!("gen{generation:03}_{i:02}.txt")), b"x").unwrap();
    }
}

fn generation_of(title: &str) -> Option<&str> {
    title.strip_prefix("gen").and_then(|rest| rest.get(..3))
}

#[test]
fn concurrent_searches_see_one_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_generation(dir.path(), 0, 20);

    let engine = Arc::new(start(vec![dir.path().to_path_buf()]));
    engine.wait_until_idle().unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                let mut versions = HashSet::new();
                while !stop.load(Ordering::Relaxed) {
                    let page = engine.search("gen", None, 200);
                    let generations: HashSet<&str> = page
                        .items
                        .iter()
                        .filter_map(|hit| generation_of(&hit.item.title))
                        .collect();
                    assert!(generations.len() <= 1, "mixed snapshot: {generations:?}");
                    versions.insert(page.index_version);
                }
                versions
            })
        })
        .collect();

    for generation in 1..=10 {
        write_generation(dir.path(), generation, 20);
        let outcome = engine.rebuild().unwrap();
        assert!(outcome.success);
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        let versions = reader.join().unwrap();
        assert!(!versions.is_empty());
    }

    let page = engine.search("gen010", None, 200);
    let latest = page
        .items
        .iter()
        .filter(|hit| generation_of(&hit.item.title) == Some("010"))
        .count();
    assert_eq!(latest, 20);
}

#[test]
fn per_root_cap_truncates_build() {
    let dir = tempfile::tempdir().unwrap();
    write_generation(dir.path(), 0, 30);

    let engine = SearchEngine::start(
        Box::new(MemorySettingsStore::new(Some(SearchSettings {
            max_items_per_root: 10,
            ..settings_for(vec![dir.path().to_path_buf()])
        }))),
        Arc::new(NoApplications),
        LocaleResolver::default(),
    )
    .unwrap();
    engine.wait_until_idle().unwrap();

    let status = engine.index_status();
    assert!(status.ready);
    assert!(status.truncated);

    let snapshot = engine.snapshot();
    let root_label = dir.path().file_name().unwrap().to_string_lossy().to_string();
    let from_root = snapshot
        .items()
        .iter()
        .filter(|item| item.source.as_deref() == Some(root_label.as_str()))
        .count();
    assert!(from_root <= 10);
}

#[test]
fn settings_change_reindexes_and_persists() {
    let data = tempfile::tempdir().unwrap();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    std::fs::write(second.path().join("budget.xlsx"), b"").unwrap();

    let config = Config {
        data_dir: data.path().to_path_buf(),
        ..Config::default()
    };
    let mut store = JsonSettingsStore::new(config.settings_path()).unwrap();
    store.save(&settings_for(vec![first.path().to_path_buf()])).unwrap();

    let engine = initialize(&config, Arc::new(NoApplications)).unwrap();
    engine.wait_until_idle().unwrap();
    assert!(engine.search("budget", None, 10).items.is_empty());

    let change = engine
        .update_settings(SearchSettingsUpdate {
            roots: Some(vec![second.path().to_path_buf()]),
            ..SearchSettingsUpdate::default()
        })
        .unwrap();
    assert_eq!(change, SettingsChange::Index);
    engine.wait_until_idle().unwrap();

    let page = engine.search("budget", None, 10);
    assert_eq!(page.items[0].item.title, "budget.xlsx");

    let reloaded = store.load().unwrap().unwrap();
    assert_eq!(reloaded.roots, vec![second.path().to_path_buf()]);
}

#[test]
fn out_of_range_update_is_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let engine = start(vec![dir.path().to_path_buf()]);

    engine
        .update_settings(SearchSettingsUpdate {
            max_scan_depth: Some(0),
            max_total_items: Some(10_000_000),
            refresh_interval_secs: Some(5),
            ..SearchSettingsUpdate::default()
        })
        .unwrap();

    let settings = engine.settings();
    assert_eq!(settings.max_scan_depth, 1);
    assert_eq!(settings.max_total_items, 500_000);
    assert_eq!(settings.refresh_interval_secs, 30);
}

#[test]
fn failed_rebuild_keeps_serving_prior_snapshot() {
    let parent = tempfile::tempdir().unwrap();
    let root = parent.path().join("library");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("thesis.tex"), b"").unwrap();

    let engine = start(vec![root.clone()]);
    engine.wait_until_idle().unwrap();
    let version = engine.index_status().index_version;

    std::fs::remove_dir_all(&root).unwrap();
    let outcome = engine.rebuild().unwrap();
    assert!(!outcome.success);
    assert!(outcome.error.is_some());

    let status = engine.index_status();
    assert_eq!(status.index_version, version);
    assert!(status.last_error.is_some());
    assert_eq!(engine.search("thesis", None, 5).items.len(), 1);
}

#[test]
fn unreadable_first_build_falls_back_to_catalog() {
    let parent = tempfile::tempdir().unwrap();
    let engine = start(vec![parent.path().join("missing")]);
    engine.wait_until_idle().unwrap();

    let status = engine.index_status();
    assert!(status.ready);
    assert!(status.last_error.is_some());
    assert!(!engine.search("base64", None, 5).items.is_empty());
}
