//! CLI session wrapper.

use async_trait::async_trait;

use salon_core::Result;
use salon_core::documents::{RawRecord, SortSpec};
use salon_core::traits::Session;
use salon_core::types::{AccessToken, Collection, Fields, RecordId, StoreUrl};
use salon_file::FileSession;
use salon_http::HttpSession;

/// Session wrapper for CLI use.
#[derive(Debug, Clone)]
pub enum CliSession {
    File(FileSession),
    Http(HttpSession),
}

impl CliSession {
    pub fn uid(&self) -> &RecordId {
        match self {
            CliSession::File(session) => session.uid(),
            CliSession::Http(session) => session.uid(),
        }
    }

    pub fn store_url(&self) -> &StoreUrl {
        match self {
            CliSession::File(session) => session.store_url(),
            CliSession::Http(session) => session.store_url(),
        }
    }

    pub fn access_token(&self) -> AccessToken {
        match self {
            CliSession::File(session) => session.access_token(),
            CliSession::Http(session) => session.access_token(),
        }
    }
}

#[async_trait]
impl Session for CliSession {
    fn uid(&self) -> &RecordId {
        CliSession::uid(self)
    }

    fn store_url(&self) -> &StoreUrl {
        CliSession::store_url(self)
    }

    fn access_token(&self) -> AccessToken {
        CliSession::access_token(self)
    }

    async fn list(&self, collection: &Collection, order: &SortSpec) -> Result<Vec<RawRecord>> {
        match self {
            CliSession::File(session) => session.list(collection, order).await,
            CliSession::Http(session) => session.list(collection, order).await,
        }
    }

    async fn get(&self, collection: &Collection, id: &RecordId) -> Result<RawRecord> {
        match self {
            CliSession::File(session) => session.get(collection, id).await,
            CliSession::Http(session) => session.get(collection, id).await,
        }
    }

    async fn create(&self, collection: &Collection, fields: Fields) -> Result<RecordId> {
        match self {
            CliSession::File(session) => session.create(collection, fields).await,
            CliSession::Http(session) => session.create(collection, fields).await,
        }
    }

    async fn update(
        &self,
        collection: &Collection,
        id: &RecordId,
        fields: Fields,
        merge: bool,
    ) -> Result<()> {
        match self {
            CliSession::File(session) => session.update(collection, id, fields, merge).await,
            CliSession::Http(session) => session.update(collection, id, fields, merge).await,
        }
    }

    async fn delete(&self, collection: &Collection, id: &RecordId) -> Result<()> {
        match self {
            CliSession::File(session) => session.delete(collection, id).await,
            CliSession::Http(session) => session.delete(collection, id).await,
        }
    }
}
