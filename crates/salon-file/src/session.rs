//! File-backed session implementation.

use async_trait::async_trait;
use tracing::{debug, instrument};

use salon_core::Result;
use salon_core::documents::{RawRecord, SortSpec};
use salon_core::traits::Session as SessionTrait;
use salon_core::types::{AccessToken, Collection, Fields, RecordId, StoreUrl};

use crate::backend::FileBackend;

/// Session for a file-backed record store.
#[derive(Debug, Clone)]
pub struct FileSession {
    backend: FileBackend,
    uid: RecordId,
    access_token: AccessToken,
}

impl FileSession {
    pub(crate) fn new(backend: FileBackend, uid: RecordId, access_token: AccessToken) -> Self {
        Self {
            backend,
            uid,
            access_token,
        }
    }

    /// Rebuild a session from a persisted access token.
    pub fn from_persisted(backend: FileBackend, access_token: AccessToken) -> Result<Self> {
        let (uid, _) = FileBackend::parse_token(&access_token)?;
        Ok(Self::new(backend, uid, access_token))
    }
}

#[async_trait]
impl SessionTrait for FileSession {
    fn uid(&self) -> &RecordId {
        &self.uid
    }

    fn store_url(&self) -> &StoreUrl {
        self.backend.url()
    }

    fn access_token(&self) -> AccessToken {
        self.access_token.clone()
    }

    #[instrument(skip(self), fields(uid = %self.uid, %collection))]
    async fn list(&self, collection: &Collection, order: &SortSpec) -> Result<Vec<RawRecord>> {
        debug!("Listing records");
        self.backend.store().list_records(collection, order).await
    }

    #[instrument(skip(self), fields(uid = %self.uid, %collection, %id))]
    async fn get(&self, collection: &Collection, id: &RecordId) -> Result<RawRecord> {
        debug!("Getting record");
        self.backend.store().get_record(collection, id).await
    }

    #[instrument(skip(self, fields), fields(uid = %self.uid, %collection))]
    async fn create(&self, collection: &Collection, fields: Fields) -> Result<RecordId> {
        debug!("Creating record");
        self.backend.ensure_write_access(&self.access_token)?;
        self.backend.store().create_record(collection, fields).await
    }

    #[instrument(skip(self, fields), fields(uid = %self.uid, %collection, %id))]
    async fn update(
        &self,
        collection: &Collection,
        id: &RecordId,
        fields: Fields,
        merge: bool,
    ) -> Result<()> {
        debug!("Updating record");
        self.backend.ensure_write_access(&self.access_token)?;
        self.backend
            .store()
            .update_record(collection, id, fields, merge)
            .await
    }

    #[instrument(skip(self), fields(uid = %self.uid, %collection, %id))]
    async fn delete(&self, collection: &Collection, id: &RecordId) -> Result<()> {
        debug!("Deleting record");
        self.backend.ensure_write_access(&self.access_token)?;
        self.backend.store().delete_record(collection, id).await
    }
}
