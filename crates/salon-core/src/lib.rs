//! salon-core - Core types and traits for the salon CMS toolkit.

pub mod booking;
pub mod catalog;
pub mod documents;
pub mod error;
pub mod form;
pub mod gallery;
pub mod hours;
pub mod records;
pub mod table;
pub mod traits;
pub mod types;

pub use documents::{Direction, RawRecord, Resource, Snapshot, SortSpec};
pub use error::Error;
pub use records::{BlogPost, Product, Review, Service, ServiceCategory, Stylist};
pub use traits::{ObjectStore, Session, SignUpOutput, Store, Watch};
pub use types::{
    AccessToken, Collection, Credentials, Fields, RecordId, Slug, StoreUrl,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
