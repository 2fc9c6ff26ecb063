//! Store backend selection for the CLI.
//!
//! The CLI talks either to a local file store (`file://`) or to the
//! hosted store's REST API; both are constructed explicitly from the
//! resolved store URL and passed down, never held in a global.

use std::pin::Pin;

use anyhow::{Context, Result};
use async_trait::async_trait;

use salon_core::documents::{RawRecord, SortSpec};
use salon_core::traits::{ObjectStore, ProgressFn, SignUpOutput, Store, Watch};
use salon_core::types::{Collection, Credentials, StoreUrl};
use salon_file::{FileBackend, FileObjects};
use salon_http::{HttpBackend, HttpObjects};

use crate::session::{CliSession, storage};

/// Environment variable naming the default store URL.
pub const STORE_ENV: &str = "SALON_STORE";

/// Backend wrapper for CLI use.
pub enum CliBackend {
    File(FileBackend),
    Http(HttpBackend),
}

impl CliBackend {
    /// Construct a backend for a store URL.
    pub fn from_url(url: &StoreUrl) -> Result<Self> {
        if url.is_local() {
            let path = url
                .to_file_path()
                .context("Failed to convert file:// URL to path")?;
            Ok(CliBackend::File(FileBackend::new(&path, url.clone())))
        } else {
            Ok(CliBackend::Http(HttpBackend::new(url.clone())))
        }
    }

    pub async fn sign_in(&self, credentials: Credentials) -> Result<CliSession> {
        let session = match self {
            CliBackend::File(backend) => CliSession::File(backend.sign_in(credentials).await?),
            CliBackend::Http(backend) => CliSession::Http(backend.sign_in(credentials).await?),
        };
        Ok(session)
    }

    pub async fn sign_up(
        &self,
        handle: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<SignUpOutput> {
        let output = match self {
            CliBackend::File(backend) => backend.sign_up(handle, password, email).await?,
            CliBackend::Http(backend) => backend.sign_up(handle, password, email).await?,
        };
        Ok(output)
    }

    pub async fn list(
        &self,
        collection: &Collection,
        order: &SortSpec,
    ) -> Result<Vec<RawRecord>> {
        let records = match self {
            CliBackend::File(backend) => backend.list(collection, order).await?,
            CliBackend::Http(backend) => backend.list(collection, order).await?,
        };
        Ok(records)
    }

    pub fn watch(
        &self,
        collection: &Collection,
        order: &SortSpec,
    ) -> Result<Pin<Box<dyn Watch>>> {
        let watch: Pin<Box<dyn Watch>> = match self {
            CliBackend::File(backend) => Box::pin(backend.watch(collection, order)?),
            CliBackend::Http(backend) => Box::pin(backend.watch(collection, order)?),
        };
        Ok(watch)
    }
}

/// Object store wrapper for CLI use.
pub enum CliObjects {
    File(FileObjects),
    Http(HttpObjects),
}

#[async_trait]
impl ObjectStore for CliObjects {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        on_progress: Option<ProgressFn>,
    ) -> salon_core::Result<String> {
        match self {
            CliObjects::File(objects) => objects.upload(path, bytes, on_progress).await,
            CliObjects::Http(objects) => objects.upload(path, bytes, on_progress).await,
        }
    }
}

/// The object store matching a session's backend.
pub fn objects_for(session: &CliSession) -> Result<CliObjects> {
    let url = session.store_url();
    if url.is_local() {
        let path = url
            .to_file_path()
            .context("Failed to convert file:// URL to path")?;
        Ok(CliObjects::File(FileObjects::new(&path)))
    } else {
        Ok(CliObjects::Http(HttpObjects::new(
            url.clone(),
            session.access_token(),
        )))
    }
}

/// Resolve the store URL: `--store` flag, then `SALON_STORE`, then the
/// persisted session's store, then a local store in the data directory.
pub fn resolve_store_url(flag: Option<&str>) -> Result<StoreUrl> {
    if let Some(value) = flag {
        return StoreUrl::new(value).context("Invalid --store URL");
    }

    if let Ok(value) = std::env::var(STORE_ENV) {
        return StoreUrl::new(&value)
            .with_context(|| format!("Invalid {} URL", STORE_ENV));
    }

    if let Some(url) = storage::stored_store_url()? {
        return Ok(url);
    }

    let default = storage::data_dir()?.join("store-root");
    StoreUrl::new(format!("file://{}", default.display()))
        .context("Invalid default store path")
}
