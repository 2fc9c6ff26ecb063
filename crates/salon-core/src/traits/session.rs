//! Authenticated session trait.

use async_trait::async_trait;

use crate::Result;
use crate::documents::{RawRecord, SortSpec};
use crate::types::{AccessToken, Collection, Fields, RecordId, StoreUrl};

/// An authenticated session for record operations.
#[async_trait]
pub trait Session: Send + Sync {
    /// Returns the account uid associated with this session.
    fn uid(&self) -> &RecordId;

    /// Returns the store URL associated with this session.
    fn store_url(&self) -> &StoreUrl;

    /// Returns the access token for this session.
    fn access_token(&self) -> AccessToken;

    /// List a collection, ordered by the given spec.
    async fn list(&self, collection: &Collection, order: &SortSpec) -> Result<Vec<RawRecord>>;

    /// Fetch a single record by id.
    async fn get(&self, collection: &Collection, id: &RecordId) -> Result<RawRecord>;

    /// Create a new record and return its store-assigned id.
    ///
    /// `$serverTimestamp` sentinels in the payload are resolved to the
    /// store's clock at write time.
    async fn create(&self, collection: &Collection, fields: Fields) -> Result<RecordId>;

    /// Update an existing record.
    ///
    /// With `merge` set, only the supplied fields are overwritten and the
    /// rest of the document is retained; otherwise the document is
    /// replaced.
    async fn update(
        &self,
        collection: &Collection,
        id: &RecordId,
        fields: Fields,
        merge: bool,
    ) -> Result<()>;

    /// Delete a record by id.
    async fn delete(&self, collection: &Collection, id: &RecordId) -> Result<()>;
}
