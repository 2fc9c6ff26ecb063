//! Core traits for record store, session and object store behavior.

mod objects;
mod session;
mod store;
mod watch;

pub use objects::{ObjectStore, ProgressFn};
pub use session::Session;
pub use store::{SignUpOutput, Store};
pub use watch::Watch;
