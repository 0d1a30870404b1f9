//! Locale resolution and cross-language aliases for built-in items.
//!
//! The host reports its locale as a BCP 47-ish tag which may be missing or
//! blank during early boot; [`resolve`] falls back to [`DEFAULT_LOCALE`] in
//! that case. Built-in commands carry alias phrases in several languages so a
//! query typed in English finds a command whose native title is Chinese, and
//! the other way around.

mod aliases;
mod resolver;

pub use aliases::{Alias, AliasHit, AliasMatch, AliasTable};
pub use resolver::{language_of, resolve, LocaleResolver, DEFAULT_LOCALE};
