//! Locally persisted pending-order records

use std::path::{Path, PathBuf};

/// JSON array of order/agent records left by earlier trading sessions
#[derive(Debug, Clone)]
pub struct PendingOrderStore {
    path: PathBuf,
}

impl PendingOrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents with an empty array
    pub async fn clear(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, "[]").await
    }

    /// Stored records; a missing file holds none
    pub async fn load(&self) -> std::io::Result<Vec<serde_json::Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
