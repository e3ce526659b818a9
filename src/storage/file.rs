//! Flat-file page store
//!
//! Each page lives at `<data_dir>/<title>.txt` holding the raw body bytes.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{Page, PageStore, StoreError, Title};

pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `data_dir`, creating the directory if missing
    pub fn open(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Path of the file backing `title`
    pub fn page_path(&self, title: &Title) -> PathBuf {
        self.data_dir.join(format!("{title}.txt"))
    }
}

#[async_trait]
impl PageStore for FileStore {
    async fn load(&self, title: &Title) -> Result<Page, StoreError> {
        match fs::read(self.page_path(title)).await {
            Ok(body) => Ok(Page::new(title.clone(), body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(title.clone())),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn save(&self, page: &Page) -> Result<(), StoreError> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(self.page_path(&page.title))
            .await
            .map_err(StoreError::Io)?;
        file.write_all(&page.body).await.map_err(StoreError::Io)?;
        file.flush().await.map_err(StoreError::Io)
    }
}
