//! Background index worker.
//!
//! All builds run on one dedicated thread so that searching never waits on
//! the filesystem. Requests (startup, timer, explicit rebuild, settings
//! change) are coalesced into a single pending slot.
//!
//! - `messages`: [`BuildTrigger`], the reasons a build is requested
//! - `handler`: [`IndexWorker`], the thread and its request slot

pub mod handler;
pub mod messages;

pub use handler::IndexWorker;
pub use messages::BuildTrigger;
