//! salon-http - HTTP-backed record store client.
//!
//! Talks to the hosted document-database REST API: bearer-token auth,
//! JSON documents, a polling collection watch and a streaming object
//! upload with progress.

mod backend;
mod client;
mod objects;
mod session;
mod watch;

pub use backend::HttpBackend;
pub use objects::HttpObjects;
pub use session::HttpSession;
pub use watch::HttpWatch;
