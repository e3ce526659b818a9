//! Page storage module
//!
//! Pages are loaded and saved by title through the [`PageStore`] capability.
//! The default backend keeps one flat file per page; the in-memory backend
//! exists for tests and throwaway runs.

mod file;
mod memory;
mod page;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use page::{Page, Title};

use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};

#[derive(Debug)]
pub enum StoreError {
    /// No page stored under this title
    NotFound(Title),
    /// Backend failed to read or write
    Io(std::io::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(title) => write!(f, "page not found: {title}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

/// Load/save pages by title
#[async_trait]
pub trait PageStore: Send + Sync + 'static {
    async fn load(&self, title: &Title) -> Result<Page, StoreError>;
    async fn save(&self, page: &Page) -> Result<(), StoreError>;
}

/// Build the configured backend
pub fn open(config: &StorageConfig) -> std::io::Result<Arc<dyn PageStore>> {
    match config.backend {
        StorageBackend::File => Ok(Arc::new(FileStore::open(&config.data_dir)?)),
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
