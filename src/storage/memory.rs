//! In-memory page store, lost on restart

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{Page, PageStore, StoreError, Title};

#[derive(Default)]
pub struct MemoryStore {
    pages: Mutex<HashMap<Title, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn load(&self, title: &Title) -> Result<Page, StoreError> {
        self.pages
            .lock()
            .await
            .get(title)
            .map(|body| Page::new(title.clone(), body.clone()))
            .ok_or_else(|| StoreError::NotFound(title.clone()))
    }

    async fn save(&self, page: &Page) -> Result<(), StoreError> {
        self.pages
            .lock()
            .await
            .insert(page.title.clone(), page.body.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_and_overwrite() {
        let store = MemoryStore::new();
        let title = Title::parse("Home").unwrap();

        assert!(matches!(
            store.load(&title).await,
            Err(StoreError::NotFound(_))
        ));

        store
            .save(&Page::new(title.clone(), b"one".to_vec()))
            .await
            .unwrap();
        store
            .save(&Page::new(title.clone(), b"two".to_vec()))
            .await
            .unwrap();
        assert_eq!(store.load(&title).await.unwrap().body, b"two");
    }
}
