//! Object store trait for file attachments.

use async_trait::async_trait;

use crate::Result;

/// Upload progress callback, invoked with 0-100 percent complete.
pub type ProgressFn = Box<dyn Fn(f32) + Send + Sync>;

/// An object store for uploaded attachments (photos, post images).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload bytes to `path` and return the public download URL.
    ///
    /// Progress is reported through `on_progress` as a 0-100 float,
    /// monotonically, ending at 100 on success. The returned URL is the
    /// value record writes reference; callers must not write a record that
    /// points at an upload which has not completed.
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        on_progress: Option<ProgressFn>,
    ) -> Result<String>;
}
