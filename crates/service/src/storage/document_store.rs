use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::record::{encode_collection, parse_collection, position_of, Record};
use crate::record_store::RecordStore;

/// JSON file-backed record collection.
///
/// Holds no copy of the data: each call loads the whole array from disk and
/// each mutation writes the whole array back. The lock only orders calls made
/// through this store, so a mutation's read and write never interleave with
/// another's. Writers in other processes are not coordinated.
pub struct DocumentStore {
    file_path: PathBuf,
    lock: RwLock<()>,
}

impl DocumentStore {
    /// Bind a store to `path`. With `create_if_missing`, a missing file is
    /// seeded with an empty array; an existing file is left as is.
    pub async fn open<P: Into<PathBuf>>(path: P, create_if_missing: bool) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();

        if create_if_missing {
            match fs::metadata(&file_path).await {
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        fs::create_dir_all(parent).await?;
                    }
                    fs::write(&file_path, encode_collection(&[])?).await?;
                    info!(path = %file_path.display(), "seeded empty record file");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Arc::new(Self { file_path, lock: RwLock::new(()) }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn load(&self) -> Result<Vec<Record>, StoreError> {
        let bytes = fs::read(&self.file_path).await?;
        let records = parse_collection(&bytes)?;
        debug!(path = %self.file_path.display(), count = records.len(), "loaded records");
        Ok(records)
    }

    async fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        let data = encode_collection(records)?;
        fs::write(&self.file_path, data).await?;
        debug!(path = %self.file_path.display(), count = records.len(), "saved records");
        Ok(())
    }

    /// Load the full collection.
    pub async fn list(&self) -> Result<Vec<Record>, StoreError> {
        let _guard = self.lock.read().await;
        self.load().await
    }

    /// Add `record` as the last element and persist. No uniqueness check.
    pub async fn append(&self, record: Record) -> Result<Record, StoreError> {
        self.update_collection(|records| {
            records.push(record.clone());
            Ok(record)
        })
        .await
    }

    /// Replace the first record keyed `key` in place and persist.
    /// `record` is stored as given, even if its own `model` differs.
    pub async fn replace(&self, key: &str, record: Record) -> Result<Record, StoreError> {
        self.update_collection(|records| {
            let idx = position_of(records, key).ok_or_else(|| StoreError::not_found(key))?;
            records[idx] = record.clone();
            Ok(record)
        })
        .await
    }

    /// Remove the first record keyed `key`, persist, and return it.
    pub async fn delete(&self, key: &str) -> Result<Record, StoreError> {
        self.update_collection(|records| {
            let idx = position_of(records, key).ok_or_else(|| StoreError::not_found(key))?;
            Ok(records.remove(idx))
        })
        .await
    }

    /// Read, apply `f`, and write back only if `f` succeeds.
    /// The file is not touched when `f` returns an error.
    pub async fn update_collection<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Vec<Record>) -> Result<T, StoreError>,
    {
        let _guard = self.lock.write().await;
        let mut records = self.load().await?;
        let out = f(&mut records)?;
        self.save(&records).await?;
        Ok(out)
    }
}

#[async_trait::async_trait]
impl RecordStore for DocumentStore {
    async fn list(&self) -> Result<Vec<Record>, StoreError> { self.list().await }
    async fn append(&self, record: Record) -> Result<Record, StoreError> { self.append(record).await }
    async fn replace(&self, key: &str, record: Record) -> Result<Record, StoreError> { self.replace(key, record).await }
    async fn delete(&self, key: &str) -> Result<Record, StoreError> { self.delete(key).await }
}
