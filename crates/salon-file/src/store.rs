//! Filesystem storage for the file-backed record store.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use salon_core::Result;
use salon_core::documents::{Direction, RawRecord, SortSpec, compare_values};
use salon_core::error::{AdapterError, Error, InvalidInputError};
use salon_core::types::{Collection, Fields, RecordId};

fn map_io(err: std::io::Error) -> Error {
    Error::Adapter(AdapterError::Io {
        message: err.to_string(),
    })
}

fn map_json(err: serde_json::Error) -> Error {
    Error::Adapter(AdapterError::Document {
        message: err.to_string(),
    })
}

/// Account metadata stored in the local store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalAccount {
    /// The uid of the account.
    pub uid: String,
    /// The handle (usually an email address) of the account.
    pub handle: String,
    /// Optional contact email when it differs from the handle.
    pub email: Option<String>,
    /// When the account was created.
    pub created_at: String,
    /// Password hash (bcrypt).
    pub password_hash: String,
}

/// An event in the change log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChangeLogEvent {
    /// Collection of the affected record.
    pub collection: String,
    /// Id of the affected record.
    pub id: String,
    /// ISO 8601 timestamp.
    pub time: String,
    /// The operation type.
    pub op: ChangeOp,
}

/// The type of change operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ChangeOp {
    /// A record was created.
    Create,
    /// A record was updated.
    Update,
    /// A record was deleted.
    Delete,
}

/// Filesystem-backed storage for a local record store.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the store data directory.
    pub(crate) fn store_dir(&self) -> PathBuf {
        self.root.join("store")
    }

    /// Get the collections directory.
    fn collections_dir(&self) -> PathBuf {
        self.store_dir().join("collections")
    }

    /// Get the directory of a specific collection.
    fn collection_dir(&self, collection: &Collection) -> PathBuf {
        self.collections_dir().join(collection.as_str())
    }

    /// Get the path for a specific record.
    fn record_path(&self, collection: &Collection, id: &RecordId) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{}.json", id))
    }

    /// Get the accounts directory.
    fn accounts_dir(&self) -> PathBuf {
        self.store_dir().join("accounts")
    }

    /// Get the path for a specific account.
    fn account_path(&self, uid: &str) -> PathBuf {
        self.accounts_dir().join(uid).join("account.json")
    }

    /// Get the objects directory for uploads.
    pub(crate) fn objects_dir(&self) -> PathBuf {
        self.store_dir().join("objects")
    }

    /// Get the change log path.
    pub(crate) fn changes_path(&self) -> PathBuf {
        self.store_dir().join("changes.jsonl")
    }

    /// Get the change log lock file path.
    fn changes_lock_path(&self) -> PathBuf {
        self.store_dir().join("changes.lock")
    }

    /// Generate a new record id.
    fn generate_id(&self) -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        uuid[..20].to_string()
    }

    /// Append an event to the change log.
    fn append_change(&self, collection: &Collection, id: &RecordId, op: ChangeOp) -> Result<()> {
        let changes_path = self.changes_path();
        let lock_path = self.changes_lock_path();

        if let Some(parent) = changes_path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(map_io)?;

        lock_file.lock_exclusive().map_err(map_io)?;

        let event = ChangeLogEvent {
            collection: collection.as_str().to_string(),
            id: id.as_str().to_string(),
            time: Utc::now().to_rfc3339(),
            op,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&changes_path)
            .map_err(map_io)?;

        let line = serde_json::to_string(&event).map_err(map_json)?;

        writeln!(file, "{}", line).map_err(map_io)?;
        file.sync_data().map_err(map_io)?;

        lock_file.unlock().map_err(map_io)?;

        Ok(())
    }

    // ========================================================================
    // Account Management
    // ========================================================================

    #[instrument(skip(self, password_hash))]
    pub fn create_account(
        &self,
        handle: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<RecordId> {
        let uuid = Uuid::new_v4().simple().to_string();
        let uid_str = format!("u{}", &uuid[..19]);
        let uid = RecordId::new(&uid_str)?;

        let account = LocalAccount {
            uid: uid_str.clone(),
            handle: handle.to_string(),
            email: email.map(str::to_string),
            created_at: Utc::now().to_rfc3339(),
            password_hash: password_hash.to_string(),
        };

        let account_path = self.account_path(&uid_str);

        if let Some(parent) = account_path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let content = serde_json::to_string_pretty(&account).map_err(map_json)?;
        fs::write(&account_path, content).map_err(map_io)?;

        debug!(uid = %uid, handle = %handle, "Created local account");

        Ok(uid)
    }

    pub fn get_account(&self, uid: &str) -> Result<Option<LocalAccount>> {
        let account_path = self.account_path(uid);

        if !account_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&account_path).map_err(map_io)?;
        let account: LocalAccount = serde_json::from_str(&content).map_err(map_json)?;

        Ok(Some(account))
    }

    pub fn list_accounts(&self) -> Result<Vec<LocalAccount>> {
        let accounts_dir = self.accounts_dir();

        if !accounts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut accounts = Vec::new();

        for entry in fs::read_dir(&accounts_dir).map_err(map_io)? {
            let entry = entry.map_err(map_io)?;
            let account_file = entry.path().join("account.json");

            if account_file.exists() {
                let content = fs::read_to_string(&account_file).map_err(map_io)?;
                if let Ok(account) = serde_json::from_str::<LocalAccount>(&content) {
                    accounts.push(account);
                }
            }
        }

        Ok(accounts)
    }

    pub fn find_account_by_handle(&self, handle: &str) -> Result<Option<LocalAccount>> {
        let accounts = self.list_accounts()?;
        Ok(accounts.into_iter().find(|a| a.handle == handle))
    }

    // ========================================================================
    // Record Operations
    // ========================================================================

    fn read_record(&self, collection: &Collection, id: &RecordId) -> Result<RawRecord> {
        let path = self.record_path(collection, id);

        if !path.exists() {
            return Err(Error::Adapter(AdapterError::NotFound {
                what: format!("{}/{}", collection, id),
            }));
        }

        let content = fs::read_to_string(&path).map_err(map_io)?;
        let fields: Fields = serde_json::from_str(&content).map_err(map_json)?;

        Ok(RawRecord {
            id: id.clone(),
            fields,
        })
    }

    fn write_record(&self, collection: &Collection, id: &RecordId, fields: &Fields) -> Result<()> {
        let path = self.record_path(collection, id);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let content = serde_json::to_string_pretty(&fields.to_value()).map_err(map_json)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content).map_err(map_io)?;
        fs::rename(&temp_path, &path).map_err(map_io)?;

        Ok(())
    }

    #[instrument(skip(self, fields))]
    pub async fn create_record(
        &self,
        collection: &Collection,
        mut fields: Fields,
    ) -> Result<RecordId> {
        let id = RecordId::new(self.generate_id()).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: format!("generated id rejected: {}", e),
            })
        })?;

        fields.resolve_server_timestamps(Utc::now());
        self.write_record(collection, &id, &fields)?;
        self.append_change(collection, &id, ChangeOp::Create)?;

        debug!(collection = %collection, id = %id, "Created record");

        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn get_record(&self, collection: &Collection, id: &RecordId) -> Result<RawRecord> {
        self.read_record(collection, id)
    }

    #[instrument(skip(self, fields))]
    pub async fn update_record(
        &self,
        collection: &Collection,
        id: &RecordId,
        mut fields: Fields,
        merge: bool,
    ) -> Result<()> {
        fields.resolve_server_timestamps(Utc::now());

        let merged = if merge {
            let mut existing = self.read_record(collection, id)?.fields;
            existing.merge_from(&fields);
            existing
        } else {
            // Replace semantics still require the record to exist.
            self.read_record(collection, id)?;
            fields
        };

        self.write_record(collection, id, &merged)?;
        self.append_change(collection, id, ChangeOp::Update)?;

        debug!(collection = %collection, id = %id, merge, "Updated record");

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_record(&self, collection: &Collection, id: &RecordId) -> Result<()> {
        let path = self.record_path(collection, id);

        if path.exists() {
            fs::remove_file(&path).map_err(map_io)?;

            self.append_change(collection, id, ChangeOp::Delete)?;

            debug!(collection = %collection, id = %id, "Deleted record");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_records(
        &self,
        collection: &Collection,
        order: &SortSpec,
    ) -> Result<Vec<RawRecord>> {
        let dir = self.collection_dir(collection);

        let mut records = Vec::new();

        if dir.exists() {
            for entry in fs::read_dir(&dir).map_err(map_io)? {
                let entry = entry.map_err(map_io)?;
                let path = entry.path();

                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }

                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default();

                let id = match RecordId::new(stem) {
                    Ok(id) => id,
                    Err(_) => continue,
                };

                if let Ok(record) = self.read_record(collection, &id) {
                    records.push(record);
                }
            }
        }

        records.sort_by(|a, b| {
            let ordering = compare_values(a.fields.get(&order.field), b.fields.get(&order.field))
                // Equal field values fall back to id order so listings
                // are deterministic across filesystems.
                .then_with(|| a.id.as_str().cmp(b.id.as_str()));
            match order.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    fn services() -> Collection {
        Collection::new("services").unwrap()
    }

    fn fields(value: serde_json::Value) -> Fields {
        Fields::new(value).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_roundtrip() {
        let (_dir, store) = store();
        let collection = services();

        let id = store
            .create_record(
                &collection,
                fields(json!({"name": "Cut", "price": 30.0})),
            )
            .await
            .unwrap();

        let record = store.get_record(&collection, &id).await.unwrap();
        assert_eq!(record.fields.get("name"), Some(&json!("Cut")));
    }

    #[tokio::test]
    async fn merge_update_retains_unspecified_fields() {
        let (_dir, store) = store();
        let collection = services();

        let id = store
            .create_record(
                &collection,
                fields(json!({"name": "Cut", "price": 30.0, "duration": 45})),
            )
            .await
            .unwrap();

        store
            .update_record(&collection, &id, fields(json!({"price": 35.0})), true)
            .await
            .unwrap();

        let record = store.get_record(&collection, &id).await.unwrap();
        assert_eq!(record.fields.get("price"), Some(&json!(35.0)));
        assert_eq!(record.fields.get("name"), Some(&json!("Cut")));
        assert_eq!(record.fields.get("duration"), Some(&json!(45)));
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let (_dir, store) = store();
        let id = RecordId::new("missing").unwrap();

        let result = store
            .update_record(&services(), &id, fields(json!({"price": 1.0})), true)
            .await;

        assert!(matches!(
            result,
            Err(Error::Adapter(AdapterError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn list_orders_by_requested_field() {
        let (_dir, store) = store();
        let collection = services();

        for (name, price) in [("Cut", 30.0), ("Balayage", 120.0), ("Updo", 60.0)] {
            store
                .create_record(&collection, fields(json!({"name": name, "price": price})))
                .await
                .unwrap();
        }

        let records = store
            .list_records(&collection, &SortSpec::asc("name"))
            .await
            .unwrap();
        let names: Vec<&str> = records
            .iter()
            .filter_map(|r| r.fields.get("name").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(names, vec!["Balayage", "Cut", "Updo"]);

        let records = store
            .list_records(&collection, &SortSpec::desc("price"))
            .await
            .unwrap();
        let prices: Vec<f64> = records
            .iter()
            .filter_map(|r| r.fields.get("price").and_then(|v| v.as_f64()))
            .collect();
        assert_eq!(prices, vec![120.0, 60.0, 30.0]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, store) = store();
        let collection = services();

        let id = store
            .create_record(&collection, fields(json!({"name": "Cut", "price": 1.0})))
            .await
            .unwrap();

        store.delete_record(&collection, &id).await.unwrap();
        store.delete_record(&collection, &id).await.unwrap();

        let records = store
            .list_records(&collection, &SortSpec::asc("name"))
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn server_timestamp_sentinel_is_resolved_on_create() {
        let (_dir, store) = store();
        let collection = Collection::new("blogPosts").unwrap();

        let mut draft = fields(json!({"title": "Post"}));
        draft.insert("publishDate", Fields::server_timestamp());

        let id = store.create_record(&collection, draft).await.unwrap();
        let record = store.get_record(&collection, &id).await.unwrap();

        let stamp = record
            .fields
            .get("publishDate")
            .and_then(|v| v.as_str())
            .unwrap();
        assert!(stamp.contains('T'));
        assert_ne!(stamp, salon_core::types::SERVER_TIMESTAMP);
    }

    #[test]
    fn accounts_roundtrip_and_lookup_by_handle() {
        let (_dir, store) = store();

        let uid = store
            .create_account("admin@salon.example", "hash", None)
            .unwrap();

        let account = store.get_account(uid.as_str()).unwrap().unwrap();
        assert_eq!(account.handle, "admin@salon.example");

        let found = store
            .find_account_by_handle("admin@salon.example")
            .unwrap()
            .unwrap();
        assert_eq!(found.uid, uid.as_str());

        assert!(store.find_account_by_handle("nobody").unwrap().is_none());
    }
}
