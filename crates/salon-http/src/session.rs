//! HTTP-backed session implementation.

use async_trait::async_trait;
use tracing::{debug, instrument};

use salon_core::Result;
use salon_core::documents::{RawRecord, SortSpec};
use salon_core::traits::Session as SessionTrait;
use salon_core::types::{AccessToken, Collection, Fields, RecordId, StoreUrl};

use crate::backend::HttpBackend;
use crate::client::ApiClient;

/// Response from creating a record.
#[derive(Debug, serde::Deserialize)]
struct CreateResponse {
    id: String,
}

/// Session for a hosted record store.
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: ApiClient,
    uid: RecordId,
    access_token: AccessToken,
}

impl HttpSession {
    pub(crate) fn new(client: ApiClient, uid: RecordId, access_token: AccessToken) -> Self {
        Self {
            client,
            uid,
            access_token,
        }
    }

    /// Rebuild a session from persisted state.
    pub fn from_persisted(base: StoreUrl, uid: RecordId, access_token: AccessToken) -> Self {
        Self::new(ApiClient::new(base), uid, access_token)
    }
}

#[async_trait]
impl SessionTrait for HttpSession {
    fn uid(&self) -> &RecordId {
        &self.uid
    }

    fn store_url(&self) -> &StoreUrl {
        self.client.base()
    }

    fn access_token(&self) -> AccessToken {
        self.access_token.clone()
    }

    #[instrument(skip(self), fields(uid = %self.uid, %collection))]
    async fn list(&self, collection: &Collection, order: &SortSpec) -> Result<Vec<RawRecord>> {
        debug!("Listing records via REST");
        HttpBackend::list_collection(
            &self.client,
            collection,
            order,
            Some(self.access_token.as_str()),
        )
        .await
    }

    #[instrument(skip(self), fields(uid = %self.uid, %collection, %id))]
    async fn get(&self, collection: &Collection, id: &RecordId) -> Result<RawRecord> {
        debug!("Getting record via REST");
        self.client
            .get(
                &format!("collections/{}/{}", collection, id),
                &[] as &[(&str, &str)],
                Some(self.access_token.as_str()),
            )
            .await
    }

    #[instrument(skip(self, fields), fields(uid = %self.uid, %collection))]
    async fn create(&self, collection: &Collection, fields: Fields) -> Result<RecordId> {
        debug!("Creating record via REST");
        let response: CreateResponse = self
            .client
            .post(
                &format!("collections/{}", collection),
                &fields,
                Some(self.access_token.as_str()),
            )
            .await?;
        RecordId::new(response.id)
    }

    #[instrument(skip(self, fields), fields(uid = %self.uid, %collection, %id))]
    async fn update(
        &self,
        collection: &Collection,
        id: &RecordId,
        fields: Fields,
        merge: bool,
    ) -> Result<()> {
        debug!("Updating record via REST");
        let merge = if merge { "true" } else { "false" };
        self.client
            .patch_no_response(
                &format!("collections/{}/{}", collection, id),
                &[("merge", merge)],
                &fields,
                self.access_token.as_str(),
            )
            .await
    }

    #[instrument(skip(self), fields(uid = %self.uid, %collection, %id))]
    async fn delete(&self, collection: &Collection, id: &RecordId) -> Result<()> {
        debug!("Deleting record via REST");
        self.client
            .delete_no_response(
                &format!("collections/{}/{}", collection, id),
                self.access_token.as_str(),
            )
            .await
    }
}
