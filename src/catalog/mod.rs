//! Non-filesystem item sources merged into every index build.
//!
//! - [`builtin`]: the static command/settings/tool catalog
//! - [`applications`]: the host-supplied installed-application catalog

pub mod applications;
pub mod builtin;

pub use applications::{ApplicationEntry, ApplicationProvider, NoApplications, StaticApplications};
pub use builtin::{BuiltinDef, BuiltinTarget};
