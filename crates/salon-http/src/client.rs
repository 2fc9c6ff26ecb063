//! Thin JSON client over the hosted store's REST API.

use serde::Serialize;
use serde::de::DeserializeOwned;

use salon_core::Result;
use salon_core::error::{AdapterError, AuthError, Error};
use salon_core::types::StoreUrl;

/// Error body the hosted store returns on non-2xx responses.
#[derive(Debug, serde::Deserialize, Default)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// JSON request helper bound to one store base URL.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    base: StoreUrl,
    http: reqwest::Client,
}

impl ApiClient {
    pub(crate) fn new(base: StoreUrl) -> Self {
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    pub(crate) fn base(&self) -> &StoreUrl {
        &self.base
    }

    pub(crate) async fn get<Q, R>(&self, path: &str, query: &Q, token: Option<&str>) -> Result<R>
    where
        Q: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.http.get(self.base.endpoint(path)).query(query);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_reqwest)?;
        Self::decode(response).await
    }

    pub(crate) async fn post<B, R>(&self, path: &str, body: &B, token: Option<&str>) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.http.post(self.base.endpoint(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_reqwest)?;
        Self::decode(response).await
    }

    pub(crate) async fn patch_no_response<B>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
        token: &str,
    ) -> Result<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .http
            .patch(self.base.endpoint(path))
            .query(query)
            .json(body)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_reqwest)?;

        Self::check(response).await
    }

    pub(crate) async fn delete_no_response(&self, path: &str, token: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.base.endpoint(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_reqwest)?;

        Self::check(response).await
    }

    pub(crate) async fn put_body<R>(
        &self,
        path: &str,
        body: reqwest::Body,
        content_type: &str,
        token: &str,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self
            .http
            .put(self.base.endpoint(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .bearer_auth(token)
            .body(body)
            .send()
            .await
            .map_err(map_reqwest)?;

        Self::decode(response).await
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let response = Self::error_for_status(response).await?;
        response.json().await.map_err(|e| {
            Error::Adapter(AdapterError::Document {
                message: e.to_string(),
            })
        })
    }

    async fn check(response: reqwest::Response) -> Result<()> {
        Self::error_for_status(response).await.map(|_| ())
    }

    async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .message
            .clone()
            .unwrap_or_else(|| status.to_string());

        Err(match status.as_u16() {
            401 => Error::Auth(AuthError::InvalidCredentials(message)),
            403 => Error::Adapter(AdapterError::PermissionDenied { message }),
            404 => Error::Adapter(AdapterError::NotFound { what: message }),
            code => Error::Adapter(AdapterError::Api {
                status: code,
                code: body.error,
                message: body.message,
            }),
        })
    }
}

pub(crate) fn map_reqwest(err: reqwest::Error) -> Error {
    Error::Adapter(AdapterError::Network {
        message: err.to_string(),
    })
}
