//! In-memory session backend.

use crate::session::SessionBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps session blobs in a process-wide map.
///
/// Sessions do not survive a restart. The map is lock-guarded so the store
/// stays correct when embedded in a multi-threaded runtime.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionBackend for MemoryBackend {
    async fn read(&self, id: &str) -> Option<Vec<u8>> {
        self.entries.read().await.get(id).cloned()
    }

    async fn write(&self, id: &str, data: &[u8]) -> anyhow::Result<()> {
        self.entries
            .write()
            .await
            .insert(id.to_string(), data.to_vec());
        Ok(())
    }

    async fn destroy(&self, id: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(id);
        Ok(())
    }
}
