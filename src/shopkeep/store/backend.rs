use crate::error::Result;
use crate::store::record::ProductRecord;
use std::path::Path;

/// Raw table I/O underneath the repository.
///
/// The backend knows nothing about products beyond their row shape:
/// validation, identity and ordering belong to the repository.
pub trait StorageBackend {
    /// Reads every row. Returns `Ok(None)` when there is no stored table yet.
    fn read_records(&self) -> Result<Option<Vec<ProductRecord>>>;

    /// Replaces the stored table with `records`.
    /// MUST NOT leave a half-written table behind on failure.
    fn write_records(&self, records: &[ProductRecord]) -> Result<()>;

    /// Where the table lives. For `MemBackend`, a virtual path.
    fn location(&self) -> &Path;
}
