//! Domain layer: catalog item model, category policy, and error types.
//!
//! Nothing in here touches the filesystem or threads; the index, search and
//! engine layers build on these types.
//!
//! # Organization
//!
//! - [`category`]: item categories with their weight/rank policy
//! - [`error`]: error type and result alias
//! - [`item`]: `Item`, `Action` and `Icon`

pub mod category;
pub mod error;
pub mod item;

pub use category::Category;
pub use error::{QuickdexError, Result};
pub use item::{Action, ActionKind, Icon, Item};
