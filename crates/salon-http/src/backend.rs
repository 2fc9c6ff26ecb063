//! HTTP-backed record store backend.

use async_trait::async_trait;
use tracing::{debug, instrument};

use salon_core::Result;
use salon_core::documents::{RawRecord, SortSpec};
use salon_core::traits::{SignUpOutput, Store};
use salon_core::types::{AccessToken, Collection, Credentials, RecordId, StoreUrl};

use crate::client::ApiClient;
use crate::session::HttpSession;
use crate::watch::HttpWatch;

/// Request body for signIn.
#[derive(Debug, serde::Serialize)]
struct SignInRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

/// Response from signIn.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    uid: String,
    access_token: String,
}

/// Request body for signUp.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    handle: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

/// Response from signUp.
#[derive(Debug, serde::Deserialize)]
struct SignUpResponse {
    uid: String,
    handle: String,
}

/// Response from listing a collection.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ListResponse {
    pub(crate) records: Vec<RawRecord>,
}

/// A hosted record store reached over its REST API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    /// Create a backend for the given hosted store URL.
    pub fn new(base: StoreUrl) -> Self {
        Self {
            client: ApiClient::new(base),
        }
    }

    pub(crate) async fn list_collection(
        client: &ApiClient,
        collection: &Collection,
        order: &SortSpec,
        token: Option<&str>,
    ) -> Result<Vec<RawRecord>> {
        let response: ListResponse = client
            .get(
                &format!("collections/{}", collection),
                &[
                    ("orderBy", order.field.as_str()),
                    ("direction", order.direction.as_str()),
                ],
                token,
            )
            .await?;
        Ok(response.records)
    }
}

#[async_trait]
impl Store for HttpBackend {
    type Session = HttpSession;
    type Watch = HttpWatch;

    fn url(&self) -> &StoreUrl {
        self.client.base()
    }

    #[instrument(skip(self, credentials))]
    async fn sign_in(&self, credentials: Credentials) -> Result<Self::Session> {
        debug!("Signing in");

        let response: SignInResponse = self
            .client
            .post(
                "auth/signIn",
                &SignInRequest {
                    identifier: credentials.identifier(),
                    password: credentials.password(),
                },
                None,
            )
            .await?;

        Ok(HttpSession::new(
            self.client.clone(),
            RecordId::new(response.uid)?,
            AccessToken::new(response.access_token),
        ))
    }

    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        handle: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<SignUpOutput> {
        debug!("Signing up");

        let response: SignUpResponse = self
            .client
            .post(
                "auth/signUp",
                &SignUpRequest {
                    handle,
                    password,
                    email,
                },
                None,
            )
            .await?;

        Ok(SignUpOutput {
            uid: RecordId::new(response.uid)?,
            handle: response.handle,
        })
    }

    #[instrument(skip(self))]
    async fn list(&self, collection: &Collection, order: &SortSpec) -> Result<Vec<RawRecord>> {
        Self::list_collection(&self.client, collection, order, None).await
    }

    fn watch(&self, collection: &Collection, order: &SortSpec) -> Result<Self::Watch> {
        Ok(HttpWatch::new(
            self.client.clone(),
            collection.clone(),
            order.clone(),
        ))
    }
}
