//! Record store backend trait.

use async_trait::async_trait;

use crate::Result;
use crate::documents::{RawRecord, SortSpec};
use crate::types::{Collection, Credentials, RecordId, StoreUrl};

use super::{Session, Watch};

/// Output from account creation.
#[derive(Debug, Clone)]
pub struct SignUpOutput {
    /// The uid of the created account.
    pub uid: RecordId,
    /// The handle of the created account.
    pub handle: String,
}

/// A record store backend.
///
/// This is the entry point to a hosted or local document store: anonymous
/// reads, live collection subscriptions, and the authentication operations
/// that produce a [`Session`] for writes.
#[async_trait]
pub trait Store: Send + Sync {
    /// Session type for this backend.
    type Session: Session;
    /// Live subscription stream type for this backend.
    type Watch: Watch;

    /// Returns the store URL for this instance.
    fn url(&self) -> &StoreUrl;

    /// Authenticate and create a new session.
    async fn sign_in(&self, credentials: Credentials) -> Result<Self::Session>;

    /// Create a new account.
    async fn sign_up(
        &self,
        handle: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<SignUpOutput>;

    /// List a collection anonymously, ordered by the given spec.
    ///
    /// Reference data (services, stylists, posts, products) is publicly
    /// readable; writes require a session.
    async fn list(&self, collection: &Collection, order: &SortSpec) -> Result<Vec<RawRecord>>;

    /// Subscribe to a collection as a stream of ordered snapshots.
    ///
    /// The first snapshot is delivered as soon as the collection has been
    /// read once; every subsequent change yields a fresh full list.
    /// Dropping the stream releases the subscription.
    fn watch(&self, collection: &Collection, order: &SortSpec) -> Result<Self::Watch>;
}
