//! File-backed record store backend.

use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};
use serde_json::json;

use salon_core::documents::{RawRecord, SortSpec};
use salon_core::error::{AuthError, Error, InvalidInputError};
use salon_core::traits::{SignUpOutput, Store};
use salon_core::types::{AccessToken, Collection, Credentials, RecordId, StoreUrl};
use salon_core::Result;

use crate::session::FileSession;
use crate::store::{FileStore, LocalAccount};
use crate::watch::FileWatch;

/// Filesystem-backed record store backend.
#[derive(Debug, Clone)]
pub struct FileBackend {
    store: FileStore,
    url: StoreUrl,
}

impl FileBackend {
    /// Create a new file-backed store at the given root directory.
    pub fn new(root: impl AsRef<std::path::Path>, url: StoreUrl) -> Self {
        Self {
            store: FileStore::new(root),
            url,
        }
    }

    /// Returns the store URL for this instance.
    pub fn url(&self) -> &StoreUrl {
        &self.url
    }

    /// Access the underlying file store.
    pub(crate) fn store(&self) -> &FileStore {
        &self.store
    }

    fn make_token(uid: &RecordId, password_hash: &str) -> AccessToken {
        let token = json!({
            "uid": uid.as_str(),
            "password_hash": password_hash,
        })
        .to_string();
        AccessToken::new(token)
    }

    pub(crate) fn parse_token(token: &AccessToken) -> Result<(RecordId, String)> {
        let value: serde_json::Value = serde_json::from_str(token.as_str()).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: format!("invalid token JSON: {}", e),
            })
        })?;

        let uid = value.get("uid").and_then(|v| v.as_str()).ok_or_else(|| {
            Error::InvalidInput(InvalidInputError::Other {
                message: "token missing 'uid'".to_string(),
            })
        })?;

        let password_hash = value
            .get("password_hash")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                Error::InvalidInput(InvalidInputError::Other {
                    message: "token missing 'password_hash'".to_string(),
                })
            })?;

        Ok((RecordId::new(uid)?, password_hash.to_string()))
    }

    pub(crate) fn validate_token(&self, token: &AccessToken) -> Result<LocalAccount> {
        let (uid, password_hash) = Self::parse_token(token)?;
        let account = self
            .store
            .get_account(uid.as_str())?
            .ok_or_else(|| AuthError::InvalidCredentials("account not found".to_string()))?;

        if account.password_hash != password_hash {
            return Err(AuthError::SessionExpired.into());
        }

        Ok(account)
    }

    /// Writes require a token bound to an existing account; reads stay
    /// open, matching the hosted store's rules for reference data.
    pub(crate) fn ensure_write_access(&self, token: &AccessToken) -> Result<()> {
        self.validate_token(token).map(|_| ())
    }
}

#[async_trait]
impl Store for FileBackend {
    type Session = FileSession;
    type Watch = FileWatch;

    fn url(&self) -> &StoreUrl {
        self.url()
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<Self::Session> {
        let identifier = credentials.identifier();

        let mut account = self.store.get_account(identifier)?;
        if account.is_none() {
            account = self.store.find_account_by_handle(identifier)?;
        }
        let account = account
            .ok_or_else(|| AuthError::InvalidCredentials("account not found".to_string()))?;

        let ok = verify(credentials.password(), &account.password_hash).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;

        if !ok {
            return Err(AuthError::InvalidCredentials("invalid password".to_string()).into());
        }

        let uid = RecordId::new(&account.uid)?;
        let token = Self::make_token(&uid, &account.password_hash);

        Ok(FileSession::new(self.clone(), uid, token))
    }

    async fn sign_up(
        &self,
        handle: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<SignUpOutput> {
        if self.store.find_account_by_handle(handle)?.is_some() {
            return Err(AuthError::AccountExists {
                handle: handle.to_string(),
            }
            .into());
        }

        let password_hash = hash(password, DEFAULT_COST).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;

        let uid = self.store.create_account(handle, &password_hash, email)?;

        Ok(SignUpOutput {
            uid,
            handle: handle.to_string(),
        })
    }

    async fn list(&self, collection: &Collection, order: &SortSpec) -> Result<Vec<RawRecord>> {
        self.store.list_records(collection, order).await
    }

    fn watch(&self, collection: &Collection, order: &SortSpec) -> Result<Self::Watch> {
        FileWatch::from_store(self.store.clone(), collection.clone(), order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn backend() -> (TempDir, FileBackend) {
        let dir = TempDir::new().unwrap();
        let url = StoreUrl::new(format!("file://{}", dir.path().display())).unwrap();
        let backend = FileBackend::new(dir.path(), url);
        (dir, backend)
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let (_dir, backend) = backend();

        let output = backend
            .sign_up("admin@salon.example", "correct-horse", None)
            .await
            .unwrap();
        assert_eq!(output.handle, "admin@salon.example");

        let session = backend
            .sign_in(Credentials::new("admin@salon.example", "correct-horse"))
            .await
            .unwrap();
        assert_eq!(salon_core::Session::uid(&session), &output.uid);
    }

    #[tokio::test]
    async fn sign_in_with_wrong_password_fails() {
        let (_dir, backend) = backend();

        backend
            .sign_up("admin@salon.example", "correct-horse", None)
            .await
            .unwrap();

        let result = backend
            .sign_in(Credentials::new("admin@salon.example", "wrong"))
            .await;

        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let (_dir, backend) = backend();

        backend
            .sign_up("admin@salon.example", "pw", None)
            .await
            .unwrap();
        let result = backend.sign_up("admin@salon.example", "pw2", None).await;

        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::AccountExists { .. }))
        ));
    }
}
