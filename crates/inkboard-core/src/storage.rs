//! Storage abstraction for page-content persistence.

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::RwLock;

use thiserror::Error;

use crate::page::PageContent;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Page not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async operations, runtime-agnostic.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for page-content storage backends.
///
/// Implementations can keep contents in memory, on the filesystem, or
/// behind a remote API.
pub trait ContentStore: Send + Sync {
    /// Save the content of a page.
    fn save(&self, page_id: &str, content: &PageContent) -> BoxFuture<'_, StoreResult<()>>;

    /// Load the content of a page.
    fn load(&self, page_id: &str) -> BoxFuture<'_, StoreResult<PageContent>>;

    /// Delete the content of a page.
    fn delete(&self, page_id: &str) -> BoxFuture<'_, StoreResult<()>>;

    /// List all stored page IDs.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>>;

    /// Check whether a page has stored content.
    fn exists(&self, page_id: &str) -> BoxFuture<'_, StoreResult<bool>>;
}

/// In-memory store for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    contents: RwLock<HashMap<String, PageContent>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryStore {
    fn save(&self, page_id: &str, content: &PageContent) -> BoxFuture<'_, StoreResult<()>> {
        let page_id = page_id.to_string();
        let content = content.clone();
        Box::pin(async move {
            let mut contents = self
                .contents
                .write()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            contents.insert(page_id, content);
            Ok(())
        })
    }

    fn load(&self, page_id: &str) -> BoxFuture<'_, StoreResult<PageContent>> {
        let page_id = page_id.to_string();
        Box::pin(async move {
            let contents = self
                .contents
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            contents
                .get(&page_id)
                .cloned()
                .ok_or(StoreError::NotFound(page_id))
        })
    }

    fn delete(&self, page_id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let page_id = page_id.to_string();
        Box::pin(async move {
            let mut contents = self
                .contents
                .write()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            contents.remove(&page_id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        Box::pin(async move {
            let contents = self
                .contents
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            Ok(contents.keys().cloned().collect())
        })
    }

    fn exists(&self, page_id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let page_id = page_id.to_string();
        Box::pin(async move {
            let contents = self
                .contents
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            Ok(contents.contains_key(&page_id))
        })
    }
}

/// File-based store.
///
/// Stores page contents as JSON files in a directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store rooted at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StoreError::Io(format!("Failed to create store directory: {}", e)))?;
        }
        Ok(Self { base_path })
    }

    fn content_path(&self, page_id: &str) -> PathBuf {
        // Sanitize the ID to be safe for filenames
        let safe_id: String = page_id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl ContentStore for FileStore {
    fn save(&self, page_id: &str, content: &PageContent) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.content_path(page_id);
        let json = match serde_json::to_string(content) {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StoreError::Serialization(e.to_string())) })
            }
        };

        Box::pin(async move {
            fs::write(&path, json)
                .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))
        })
    }

    fn load(&self, page_id: &str) -> BoxFuture<'_, StoreResult<PageContent>> {
        let path = self.content_path(page_id);
        let id_owned = page_id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StoreError::NotFound(id_owned));
            }

            let json = fs::read_to_string(&path)
                .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

            serde_json::from_str(&json).map_err(|e| {
                StoreError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, page_id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.content_path(page_id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StoreError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.base_path)
                .map_err(|e| StoreError::Io(format!("Failed to list store: {}", e)))?;
            let mut ids = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        ids.push(stem.to_string());
                    }
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, page_id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let path = self.content_path(page_id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
