//! JSON-file storage for native hosts.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document::Document;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension for board files.
const BOARD_EXTENSION: &str = "json";

/// Stores each board as `<id>.json` in one directory.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open a board directory, creating it if missing.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StorageError::Io(format!("create {}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a board ID. Characters outside `[A-Za-z0-9_-]` map to `_`.
    fn board_path(&self, id: &str) -> PathBuf {
        let file_stem: String = id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(file_stem).with_extension(BOARD_EXTENSION)
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(id);
        let json = document.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("write {}: {}", path.display(), e)))?;
            log::info!("saved board to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Document>> {
        let path = self.board_path(id);
        let id = id.to_string();
        Box::pin(async move {
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(StorageError::NotFound(id));
                }
                Err(e) => return Err(StorageError::Io(format!("read {}: {}", path.display(), e))),
            };
            let doc = Document::from_json(&json)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            log::info!("loaded board {} ({} shapes)", id, doc.len());
            Ok(doc)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(id);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::Io(format!("remove {}: {}", path.display(), e))),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.root)
                .map_err(|e| StorageError::Io(format!("read {}: {}", self.root.display(), e)))?;

            let mut ids: Vec<String> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(BOARD_EXTENSION))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.board_path(id);
        Box::pin(async move { Ok(path.is_file()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Element, ElementKind, Frame, Shape};
    use pollster::block_on;
    use tempfile::tempdir;

    fn board() -> Document {
        let mut doc = Document::new();
        doc.name = "Sprint board".to_string();
        doc.insert(Shape::Element(Element::new(
            ElementKind::Ellipse,
            Frame::new(10.0, 10.0, 60.0, 40.0),
        )));
        doc
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        let doc = board();

        block_on(storage.save("board-1", &doc)).unwrap();
        let loaded = block_on(storage.load("board-1")).unwrap();

        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        let result = block_on(storage.load("missing"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("boards")).unwrap();
        let doc = board();

        block_on(storage.save("beta", &doc)).unwrap();
        block_on(storage.save("alpha", &doc)).unwrap();
        std::fs::write(storage.root().join("notes.txt"), "ignored").unwrap();

        assert_eq!(block_on(storage.list()).unwrap(), vec!["alpha", "beta"]);

        block_on(storage.delete("alpha")).unwrap();
        block_on(storage.delete("alpha")).unwrap();
        assert!(!block_on(storage.exists("alpha")).unwrap());
        assert!(block_on(storage.exists("beta")).unwrap());
    }

    #[test]
    fn test_id_sanitized() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        let doc = board();

        block_on(storage.save("../escape/board", &doc)).unwrap();
        assert!(dir.path().join("___escape_board.json").is_file());
        assert!(block_on(storage.exists("../escape/board")).unwrap());
    }
}
