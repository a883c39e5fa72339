//! JSON-file storage for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::canvas::CanvasDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// One `<id>.json` file per document in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Use `base_path`, creating it if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create {}: {e}", base_path.display()))
            })?;
        }
        Ok(Self { base_path })
    }

    /// File for a document id. Characters unsafe in file names become `_`.
    fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &CanvasDocument) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);
        let json = document.to_json();
        Box::pin(async move {
            let json = json?;
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))?;
            log::info!("saved document to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<CanvasDocument>> {
        let path = self.document_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
            CanvasDocument::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
                })?;
                log::info!("deleted {}", path.display());
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(Vec::new());
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;
            let mut ids: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.document_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let mut doc = CanvasDocument::new();
        doc.name = "March planner".to_string();

        block_on(storage.save("march", &doc)).unwrap();
        let loaded = block_on(storage.load("march")).unwrap();
        assert_eq!(loaded.name, "March planner");
    }

    #[test]
    fn test_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list_ignores_other_files() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let doc = CanvasDocument::new();
        block_on(storage.save("doc2", &doc)).unwrap();
        block_on(storage.save("doc1", &doc)).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(block_on(storage.list()).unwrap(), vec!["doc1", "doc2"]);
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let doc = CanvasDocument::new();
        block_on(storage.save("test", &doc)).unwrap();
        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
    }

    #[test]
    fn test_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested")).unwrap();
        let doc = CanvasDocument::new();
        block_on(storage.save("2025/03:wall*calendar", &doc)).unwrap();
        let loaded = block_on(storage.load("2025/03:wall*calendar")).unwrap();
        assert_eq!(loaded.id, doc.id);
        assert!(storage.base_path().join("2025_03_wall_calendar.json").exists());
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let result = block_on(storage.load("bad"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
