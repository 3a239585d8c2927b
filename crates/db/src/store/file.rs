use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use ragdesk_core::knowledge::{seed_items, KnowledgeItem};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

use super::KnowledgeStore;
use crate::error::StoreError;

/// Knowledge store backed by a pretty-printed JSON array on disk.
///
/// The whole array is held in memory and rewritten on every mutation. Writes
/// are serialized by the lock and land atomically via temp file and rename.
/// If persisting fails the in-memory change is rolled back.
pub struct FileKnowledgeStore {
    path: Option<PathBuf>,
    items: RwLock<Vec<KnowledgeItem>>,
}

impl FileKnowledgeStore {
    /// Open the store at `path`.
    ///
    /// A missing file is created with the seed items. An unreadable or
    /// malformed file is renamed to `<name>.corrupt-<timestamp>` and the store
    /// starts empty, so later writes never overwrite the only copy.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let items = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<Vec<KnowledgeItem>>(&raw) {
                Ok(items) => {
                    tracing::info!(path = %path.display(), count = items.len(), "Loaded knowledge base");
                    items
                }
                Err(e) => {
                    let backup = quarantine(&path).await?;
                    tracing::error!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "Knowledge file is malformed, moved aside and starting empty",
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let items = seed_items();
                write_items(&path, &items).await?;
                tracing::info!(path = %path.display(), count = items.len(), "Seeded new knowledge base");
                items
            }
            Err(e) => {
                let backup = quarantine(&path).await?;
                tracing::error!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "Knowledge file is unreadable, moved aside and starting empty",
                );
                Vec::new()
            }
        };

        Ok(Self {
            path: Some(path),
            items: RwLock::new(items),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory(items: Vec<KnowledgeItem>) -> Self {
        Self {
            path: None,
            items: RwLock::new(items),
        }
    }

    async fn persist(&self, items: &[KnowledgeItem]) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => write_items(path, items).await,
            None => Ok(()),
        }
    }
}

/// Rename a file that failed to load to `<name>.corrupt-<timestamp>`.
async fn quarantine(path: &Path) -> Result<PathBuf, StoreError> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ")));
    let backup = path.with_file_name(name);
    tokio::fs::rename(path, &backup).await?;
    Ok(backup)
}

/// Write `items` to a temp file beside `path`, then rename it over `path`.
///
/// Readers see either the old contents or the new ones, never a truncated
/// file.
async fn write_items(path: &Path, items: &[KnowledgeItem]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(items)?;
    let target = path.to_path_buf();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(std::io::Error::other)??;

    tracing::debug!(path = %path.display(), count = items.len(), "Knowledge base saved");
    Ok(())
}

#[async_trait]
impl KnowledgeStore for FileKnowledgeStore {
    fn backend(&self) -> &'static str {
        if self.path.is_some() {
            "file"
        } else {
            "memory"
        }
    }

    async fn all(&self) -> Result<Vec<KnowledgeItem>, StoreError> {
        Ok(self.items.read().await.clone())
    }

    async fn insert(&self, item: KnowledgeItem) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        items.push(item);

        if let Err(e) = self.persist(&items).await {
            items.pop();
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<Option<KnowledgeItem>, StoreError> {
        let mut items = self.items.write().await;
        let Some(index) = items.iter().position(|item| item.id == id) else {
            return Ok(None);
        };

        let removed = items.remove(index);
        if let Err(e) = self.persist(&items).await {
            items.insert(index, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.items.read().await.len())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            tokio::fs::metadata(path).await?;
        }
        Ok(())
    }
}
