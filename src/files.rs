//! File reference table.
//!
//! Byte storage is owned by an external service; this table tracks the
//! identifiers jobs refer to. References are immutable once created. The
//! guard against removing a file a non-terminal job still needs lives in
//! the coordinator, which can see the job table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An uploaded artifact reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReference {
    /// File identifier.
    pub id: String,
    /// Filename as reported by the storage service.
    pub filename: String,
    /// Owning user.
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Errors for file table operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileError {
    #[error("file '{0}' not found")]
    NotFound(String),
}

/// In-memory file reference table, keyed by file id.
#[derive(Debug, Default)]
pub struct FileTable {
    files: BTreeMap<String, FileReference>,
}

impl FileTable {
    /// Record a new file reference.
    pub fn register(
        &mut self,
        id: String,
        filename: &str,
        owner_id: &str,
        at: DateTime<Utc>,
    ) -> FileReference {
        let file = FileReference {
            id: id.clone(),
            filename: filename.to_string(),
            owner_id: owner_id.to_string(),
            created_at: at,
        };
        self.files.insert(id, file.clone());
        file
    }

    /// Get a file reference owned by `owner_id`. Another user's file
    /// surfaces as not found.
    pub fn get(&self, id: &str, owner_id: &str) -> Result<FileReference, FileError> {
        self.files
            .get(id)
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| FileError::NotFound(id.to_string()))
    }

    /// Check that a file reference exists, regardless of owner. Used for
    /// output attachments reported by the execution agent.
    pub fn exists(&self, id: &str) -> bool {
        self.files.contains_key(id)
    }

    /// List one user's file references.
    pub fn list(&self, owner_id: &str) -> Vec<FileReference> {
        self.files
            .values()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// Drop a file reference owned by `owner_id`.
    pub fn remove(&mut self, id: &str, owner_id: &str) -> Result<FileReference, FileError> {
        let owned = self.files.get(id).is_some_and(|f| f.owner_id == owner_id);
        if !owned {
            return Err(FileError::NotFound(id.to_string()));
        }
        self.files
            .remove(id)
            .ok_or_else(|| FileError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::now;

    #[test]
    fn test_register_and_get() {
        let mut table = FileTable::default();
        let file = table.register("file-1".to_string(), "fw.bin", "user-1", now());

        let fetched = table.get(&file.id, "user-1").unwrap();
        assert_eq!(fetched.filename, "fw.bin");
    }

    #[test]
    fn test_other_owner_sees_not_found() {
        let mut table = FileTable::default();
        table.register("file-1".to_string(), "fw.bin", "user-1", now());

        assert!(matches!(
            table.get("file-1", "user-2"),
            Err(FileError::NotFound(_))
        ));
        assert!(matches!(
            table.remove("file-1", "user-2"),
            Err(FileError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_is_owner_scoped() {
        let mut table = FileTable::default();
        table.register("file-1".to_string(), "a.bin", "user-1", now());
        table.register("file-2".to_string(), "b.bin", "user-2", now());

        let files = table.list("user-1");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "a.bin");
    }

    #[test]
    fn test_remove() {
        let mut table = FileTable::default();
        table.register("file-1".to_string(), "fw.bin", "user-1", now());

        table.remove("file-1", "user-1").unwrap();
        assert!(!table.exists("file-1"));
    }
}
