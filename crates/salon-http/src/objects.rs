//! HTTP-backed object store for attachments.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, instrument};

use salon_core::Result;
use salon_core::error::{Error, UploadError};
use salon_core::traits::{ObjectStore, ProgressFn};
use salon_core::types::{AccessToken, StoreUrl};

use crate::client::ApiClient;

/// Upload chunk size; one progress callback fires per chunk.
const CHUNK_SIZE: usize = 64 * 1024;

/// Response from an object upload.
#[derive(Debug, serde::Deserialize)]
struct UploadResponse {
    #[serde(rename = "downloadURL")]
    download_url: String,
}

/// Object store uploading attachments through the hosted store's API.
#[derive(Debug, Clone)]
pub struct HttpObjects {
    client: ApiClient,
    access_token: AccessToken,
}

impl HttpObjects {
    /// Create an object store client for the given base URL and session
    /// token.
    pub fn new(base: StoreUrl, access_token: AccessToken) -> Self {
        Self {
            client: ApiClient::new(base),
            access_token,
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjects {
    #[instrument(skip(self, bytes, on_progress), fields(size = bytes.len()))]
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        on_progress: Option<ProgressFn>,
    ) -> Result<String> {
        if path.is_empty() || path.starts_with('/') || path.contains("..") {
            return Err(Error::Upload(UploadError::InvalidPath {
                path: path.to_string(),
                reason: "must be a relative path without '..' segments".to_string(),
            }));
        }

        let total = bytes.len();
        let chunks: Vec<Bytes> = bytes.chunks(CHUNK_SIZE).map(Bytes::copy_from_slice).collect();
        let on_progress = on_progress.map(Arc::new);
        let progress_stream = on_progress.clone();

        // Progress is reported as the request body is pulled, chunk by
        // chunk, so callers see the same 0-100 ramp as the file store.
        let body_stream = async_stream::stream! {
            let mut sent = 0usize;
            for chunk in chunks {
                sent += chunk.len();
                if let Some(progress) = &progress_stream {
                    progress(sent as f32 / total as f32 * 100.0);
                }
                yield Ok::<Bytes, std::convert::Infallible>(chunk);
            }
        };

        let response: UploadResponse = self
            .client
            .put_body(
                &format!("objects/{}", path),
                reqwest::Body::wrap_stream(body_stream),
                "application/octet-stream",
                self.access_token.as_str(),
            )
            .await
            .map_err(|e| match e {
                // Everything that blocks the record write is an upload
                // failure from the form's point of view.
                Error::Upload(inner) => Error::Upload(inner),
                other => Error::Upload(UploadError::Failed {
                    message: other.to_string(),
                }),
            })?;

        if total == 0
            && let Some(progress) = &on_progress
        {
            progress(100.0);
        }

        debug!(url = %response.download_url, "Uploaded object");

        Ok(response.download_url)
    }
}
