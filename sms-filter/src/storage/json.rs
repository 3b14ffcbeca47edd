use crate::error::{FilterError, Result};
use crate::storage::{Collection, CollectionStore};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

/// Stores each collection as `<name>.json` under a base directory
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file backing a collection
    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.base_path.join(format!("{}.json", collection.name()))
    }

    async fn ensure_base_dir(&self) -> Result<()> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).await.map_err(|e| {
                FilterError::Storage(format!(
                    "Failed to create directory {:?}: {}",
                    self.base_path, e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CollectionStore for JsonFileStore {
    async fn load(&self, collection: Collection) -> Result<Option<Vec<serde_json::Value>>> {
        let path = self.collection_path(collection);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<serde_json::Value>(&content)? {
            serde_json::Value::Array(records) => {
                debug!("Loaded {} records from {}", records.len(), path.display());
                Ok(Some(records))
            }
            _ => Err(FilterError::Storage(format!(
                "{} does not contain a JSON array",
                path.display()
            ))),
        }
    }

    async fn save(&self, collection: Collection, records: Vec<serde_json::Value>) -> Result<()> {
        self.ensure_base_dir().await?;

        let data = serde_json::to_vec_pretty(&serde_json::Value::Array(records))?;
        let base_path = self.base_path.clone();
        let path = self.collection_path(collection);
        let target = path.clone();

        // Uniquely named temp file in the same directory, then an atomic
        // rename over the target. The temp file is removed if anything fails.
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut tmp = NamedTempFile::new_in(&base_path)?;
            tmp.write_all(&data)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| FilterError::Storage(format!("Save task for {} failed: {}", collection, e)))??;

        debug!("Saved {} to {}", collection, path.display());
        Ok(())
    }
}
