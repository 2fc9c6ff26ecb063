//! File-backed object store for attachments.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use salon_core::Result;
use salon_core::error::{AdapterError, Error, UploadError};
use salon_core::traits::{ObjectStore, ProgressFn};

use crate::store::FileStore;

/// Upload chunk size; one progress callback fires per chunk.
const CHUNK_SIZE: usize = 64 * 1024;

/// Object store writing uploads under the store's `objects/` directory.
#[derive(Debug, Clone)]
pub struct FileObjects {
    objects_dir: PathBuf,
}

impl FileObjects {
    /// Create an object store rooted at the given store directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: FileStore::new(root).objects_dir(),
        }
    }

    fn destination(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);

        let sane = !path.is_empty()
            && relative.is_relative()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !sane {
            return Err(Error::Upload(UploadError::InvalidPath {
                path: path.to_string(),
                reason: "must be a relative path without '..' segments".to_string(),
            }));
        }

        Ok(self.objects_dir.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FileObjects {
    #[instrument(skip(self, bytes, on_progress), fields(size = bytes.len()))]
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        on_progress: Option<ProgressFn>,
    ) -> Result<String> {
        let destination = self.destination(path)?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Adapter(AdapterError::Io {
                    message: e.to_string(),
                })
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&destination)
            .map_err(|e| {
                Error::Upload(UploadError::Failed {
                    message: e.to_string(),
                })
            })?;

        let total = bytes.len();
        let mut written = 0usize;

        for chunk in bytes.chunks(CHUNK_SIZE) {
            file.write_all(chunk).map_err(|e| {
                Error::Upload(UploadError::Failed {
                    message: e.to_string(),
                })
            })?;
            written += chunk.len();

            if let Some(progress) = &on_progress {
                progress(written as f32 / total as f32 * 100.0);
            }
        }

        file.sync_data().map_err(|e| {
            Error::Upload(UploadError::Failed {
                message: e.to_string(),
            })
        })?;

        // Empty uploads still complete at 100.
        if total == 0
            && let Some(progress) = &on_progress
        {
            progress(100.0);
        }

        let url = format!("file://{}", destination.display());
        debug!(url = %url, "Uploaded object");

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[tokio::test]
    async fn upload_reports_monotonic_progress_to_100() {
        let dir = TempDir::new().unwrap();
        let objects = FileObjects::new(dir.path());

        let seen = Arc::new(Mutex::new(Vec::<f32>::new()));
        let seen_cb = seen.clone();
        let on_progress: ProgressFn = Box::new(move |p| seen_cb.lock().unwrap().push(p));

        let url = objects
            .upload("blog/cover.jpg", &vec![7u8; 200_000], Some(on_progress))
            .await
            .unwrap();

        assert!(url.starts_with("file://"));
        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 100.0);

        // The object landed where the URL points.
        let path = url.strip_prefix("file://").unwrap();
        assert_eq!(fs::read(path).unwrap().len(), 200_000);
    }

    #[tokio::test]
    async fn traversal_paths_are_rejected() {
        let dir = TempDir::new().unwrap();
        let objects = FileObjects::new(dir.path());

        let result = objects.upload("../escape.jpg", &[1, 2, 3], None).await;

        assert!(matches!(result, Err(Error::Upload(_))));
    }
}
