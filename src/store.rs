use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::models::Strategy;

/// Fixed name of the single strategy slot, carried over from the browser
/// storage key it replaces.
pub const STORAGE_KEY: &str = "stratgen_ai_strategy";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Io(#[from] io::Error),
    #[error("stored strategy is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Narrow single-slot persistence seam: one logical key, one serialized
/// strategy document. Backing stores are swappable behind this trait.
#[async_trait]
pub trait StrategyStore: Send + Sync {
    async fn load(&self) -> Result<Option<Strategy>, StoreError>;
    async fn save(&self, strategy: &Strategy) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

/// File-backed store: one JSON document under the data directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self { path: data_dir.as_ref().join(format!("{STORAGE_KEY}.json")) }
    }
}

#[async_trait]
impl StrategyStore for FileStore {
    async fn load(&self) -> Result<Option<Strategy>, StoreError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let strategy = serde_json::from_str(&text)?;
        Ok(Some(strategy))
    }

    async fn save(&self, strategy: &Strategy) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let text = serde_json::to_string(strategy)?;
        fs::write(&self.path, text).await?;
        debug!("Saved strategy {} to {}", strategy.id, self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store holding the serialized document, used as a drop-in
/// backing store in tests. Goes through the same JSON text as `FileStore`
/// so it exercises the identical contract.
pub struct MemoryStore {
    slot: parking_lot::Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { slot: parking_lot::Mutex::new(None) }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StrategyStore for MemoryStore {
    async fn load(&self) -> Result<Option<Strategy>, StoreError> {
        match self.slot.lock().as_deref() {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, strategy: &Strategy) -> Result<(), StoreError> {
        let text = serde_json::to_string(strategy)?;
        *self.slot.lock() = Some(text);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock() = None;
        Ok(())
    }
}
