//! Session storage for persisting login state.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use salon_core::types::{AccessToken, RecordId, StoreUrl};
use salon_file::{FileBackend, FileSession};
use salon_http::HttpSession;

use super::CliSession;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    uid: String,
    handle: Option<String>,
    store: String,
    access_token: String,
}

/// Get the CLI data directory.
pub fn data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "salon").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir().to_path_buf();
    fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

    Ok(data_dir)
}

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("session.json"))
}

/// Save a session to disk.
pub async fn save_session(session: &CliSession, handle: Option<&str>) -> Result<()> {
    let stored = StoredSession {
        uid: session.uid().to_string(),
        handle: handle.map(str::to_string),
        store: session.store_url().to_string(),
        access_token: session.access_token().as_str().to_string(),
    };

    let path = session_path()?;
    let json = serde_json::to_string_pretty(&stored)?;

    fs::write(&path, &json).context("Failed to write session file")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

fn read_stored() -> Result<Option<StoredSession>> {
    let path = session_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    Ok(Some(stored))
}

/// Load a session from disk.
pub async fn load_session() -> Result<Option<CliSession>> {
    let Some(stored) = read_stored()? else {
        return Ok(None);
    };

    let store = StoreUrl::new(&stored.store).context("Invalid store URL in session")?;
    let uid = RecordId::new(&stored.uid).context("Invalid uid in session")?;
    let access_token = AccessToken::new(stored.access_token);

    if store.is_local() {
        let path = store
            .to_file_path()
            .context("Failed to convert file:// URL to path")?;
        let backend = FileBackend::new(&path, store);
        let session = FileSession::from_persisted(backend, access_token)?;
        Ok(Some(CliSession::File(session)))
    } else {
        let session = HttpSession::from_persisted(store, uid, access_token);
        Ok(Some(CliSession::Http(session)))
    }
}

/// The handle recorded at login, used to denormalize author names.
pub fn stored_handle() -> Result<Option<String>> {
    Ok(read_stored()?.and_then(|s| s.handle))
}

/// The store URL of the persisted session, if any.
pub fn stored_store_url() -> Result<Option<StoreUrl>> {
    match read_stored()? {
        Some(stored) => Ok(Some(
            StoreUrl::new(&stored.store).context("Invalid store URL in session")?,
        )),
        None => Ok(None),
    }
}

/// Clear the stored session.
pub async fn clear_session() -> Result<()> {
    let path = session_path()?;

    if path.exists() {
        fs::remove_file(&path).context("Failed to remove session file")?;
    }

    Ok(())
}
