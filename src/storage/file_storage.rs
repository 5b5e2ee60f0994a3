use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Storage, StorageError};

/// A storage that keeps each key in its own JSON file, in a local folder
#[derive(Clone, Debug, PartialEq)]
pub struct FileStorage {
    backing_folder: PathBuf,
}

impl FileStorage {
    /// Create a storage that uses `folder`. This does not touch the filesystem yet, the folder will be created on the first write
    pub fn new(folder: &Path) -> Self {
        Self {
            backing_folder: PathBuf::from(folder),
        }
    }

    /// Create a storage in the folder given by [`crate::config::STORAGE_FOLDER`]
    pub fn default_folder() -> Self {
        let folder = crate::config::get(&crate::config::STORAGE_FOLDER);
        Self::new(Path::new(&folder))
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    /// The file a given key is stored into
    pub fn file_for_key(&self, key: &str) -> PathBuf {
        let file_name = sanitize_filename::sanitize(key) + ".json";
        self.backing_folder.join(file_name)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.file_for_key(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No file at {:?}", path);
                Ok(None)
            },
            Err(err) => Err(format!("Unable to read file {:?}: {}", path, err).into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Err(err) = tokio::fs::create_dir_all(&self.backing_folder).await {
            return Err(format!("Unable to create folder {:?}: {}", self.backing_folder, err).into());
        }

        // Write aside then rename, so that a crash never leaves a half-written file
        let path = self.file_for_key(key);
        let tmp_path = path.with_extension("json.tmp");
        if let Err(err) = tokio::fs::write(&tmp_path, value).await {
            return Err(format!("Unable to write file {:?}: {}", tmp_path, err).into());
        }
        if let Err(err) = tokio::fs::rename(&tmp_path, &path).await {
            return Err(format!("Unable to move {:?} to {:?}: {}", tmp_path, path, err).into());
        }
        log::trace!("Saved {} bytes into {:?}", value.len(), path);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.file_for_key(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(format!("Unable to remove file {:?}: {}", path, err).into()),
        }
    }
}
