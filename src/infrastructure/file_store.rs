// Directory-backed key-value store, one JSON file per key
use crate::application::key_value_store::{KeyValueStore, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;

        // Write beside the target and rename so readers never see a torn file
        let target = self.path_for(key);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, value)?;
        if let Err(e) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(StoreError::Io(e));
        }

        tracing::trace!(key, path = %target.display(), bytes = value.len(), "stored item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
