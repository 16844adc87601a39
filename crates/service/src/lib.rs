//! Record service: a JSON array kept in a single file, with list / append /
//! replace-by-key / delete-by-key operations.
//! - `storage::document_store` performs the whole-file read/mutate/write cycles.
//! - `record_store::RecordStore` is the seam the HTTP layer depends on.

pub mod errors;
pub mod record;
pub mod record_store;
pub mod storage;
