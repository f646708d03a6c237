//! File-backed session backend.

use crate::session::SessionBackend;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Keeps one file per session id inside a configured directory.
///
/// The file content is the opaque blob handed to `write`; no format is
/// imposed. The conventional default directory is `/tmp`, which is
/// world-readable on most systems — point this somewhere private for
/// anything sensitive.
pub struct FileBackend {
    directory: String,
}

impl FileBackend {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        PathBuf::from(&self.directory).join(id)
    }
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new("/tmp")
    }
}

#[async_trait]
impl SessionBackend for FileBackend {
    async fn read(&self, id: &str) -> Option<Vec<u8>> {
        fs::read(self.path_for(id)).await.ok()
    }

    async fn write(&self, id: &str, data: &[u8]) -> anyhow::Result<()> {
        let path = self.path_for(id);
        fs::write(&path, data)
            .await
            .with_context(|| format!("writing session file {}", path.display()))
    }

    async fn destroy(&self, id: &str) -> anyhow::Result<()> {
        let path = self.path_for(id);
        fs::remove_file(&path)
            .await
            .with_context(|| format!("removing session file {}", path.display()))
    }
}
