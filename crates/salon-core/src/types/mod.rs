//! Core value types for the salon toolkit.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod collection;
mod credentials;
mod fields;
mod record_id;
mod slug;
mod store_url;

pub use collection::Collection;
pub use credentials::{AccessToken, Credentials};
pub use fields::{Fields, SERVER_TIMESTAMP};
pub use record_id::RecordId;
pub use slug::Slug;
pub use store_url::StoreUrl;
