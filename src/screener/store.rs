//! Accepted-pairs CSV store

use super::AcceptedPair;
use std::path::{Path, PathBuf};
use thiserror::Error;

const HEADER: [&str; 4] = ["base_market", "quote_market", "hedge_ratio", "half_life"];

/// Errors reading or writing the accepted-pairs file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Accepted-pairs file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed accepted-pairs CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    /// The file does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// CSV file holding the latest screening result
///
/// Every save replaces the whole file.
#[derive(Debug, Clone)]
pub struct AcceptedPairStore {
    path: PathBuf,
}

impl AcceptedPairStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(pairs: &[AcceptedPair]) -> Result<Vec<u8>, StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(Vec::new());

        // Headers are emitted with the first record, so an empty run writes them directly
        if pairs.is_empty() {
            writer.write_record(HEADER)?;
        }
        for pair in pairs {
            writer.serialize(pair)?;
        }

        writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))
    }

    /// Overwrite the file with `pairs`
    pub async fn save(&self, pairs: &[AcceptedPair]) -> Result<(), StoreError> {
        let content = Self::render(pairs)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Read back the persisted pairs
    pub async fn load(&self) -> Result<Vec<AcceptedPair>, StoreError> {
        let content = tokio::fs::read(&self.path).await?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_slice());

        let mut pairs = Vec::new();
        for row in reader.deserialize::<AcceptedPair>() {
            pairs.push(row?);
        }
        Ok(pairs)
    }
}
