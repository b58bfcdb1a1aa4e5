//! Plain JSON file storage, one file per key.

use std::path::PathBuf;

use super::StateStorage;
use crate::error::StorageError;

pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }
        // Write to a sibling file first so a crash never leaves half a snapshot.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        assert!(storage.read("tiny-wins-storage").unwrap().is_none());
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested"));
        storage.write("tiny-wins-storage", "{\"version\":1}").unwrap();
        assert_eq!(
            storage.read("tiny-wins-storage").unwrap().as_deref(),
            Some("{\"version\":1}")
        );
        assert!(storage.path_for("tiny-wins-storage").exists());
    }
}
