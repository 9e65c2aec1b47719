//! Persistence of the resume document

use crate::document::Document;
use crate::error::StoreError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Load/save backend for the document, mockable in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Load the stored document, `None` when nothing was saved yet
    async fn load(&self) -> Result<Option<Document>, StoreError>;

    /// Replace the stored document
    async fn save(&self, document: &Document) -> Result<(), StoreError>;

    /// Human-readable location for status messages
    fn location(&self) -> String;
}

/// Stores the document as pretty-printed JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl DocumentStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<Document>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No document at {}, starting empty", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let document = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!("Loaded document from {}", self.path.display());
        Ok(Some(document))
    }

    async fn save(&self, document: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(document).map_err(StoreError::Encode)?;

        // Stage next to the target, then rename over it
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, content)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::info!("Saved document to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
