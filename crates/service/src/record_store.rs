use async_trait::async_trait;

use crate::errors::StoreError;
use crate::record::Record;

/// Trait abstraction for record storage.
/// The file-backed `DocumentStore` is the only implementation shipped.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Record>, StoreError>;
    async fn append(&self, record: Record) -> Result<Record, StoreError>;
    async fn replace(&self, key: &str, record: Record) -> Result<Record, StoreError>;
    async fn delete(&self, key: &str) -> Result<Record, StoreError>;
}
