//! Writes `genesis.json` and `bootstrap.json` into an output directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::{BootstrapConfig, InitializerError};
use crate::ports::NodeInitializer;

/// Genesis file name.
pub const GENESIS_FILE: &str = "genesis.json";

/// Bootstrap manifest file name.
pub const BOOTSTRAP_FILE: &str = "bootstrap.json";

/// File-writing [`NodeInitializer`].
#[derive(Debug, Clone)]
pub struct FileNodeInitializer {
    out_dir: PathBuf,
}

impl FileNodeInitializer {
    /// Write into `out_dir` (created if missing).
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

#[async_trait]
impl NodeInitializer for FileNodeInitializer {
    async fn initialize(&self, config: &BootstrapConfig) -> Result<(), InitializerError> {
        tokio::fs::create_dir_all(&self.out_dir).await?;

        let genesis_path = self.out_dir.join(GENESIS_FILE);
        tokio::fs::write(&genesis_path, config.genesis.as_bytes()).await?;

        let manifest = serde_json::to_vec_pretty(&config.manifest())?;
        let manifest_path = self.out_dir.join(BOOTSTRAP_FILE);
        tokio::fs::write(&manifest_path, manifest).await?;

        info!(
            "[vb-04] Wrote {} ({} bytes) and {}",
            genesis_path.display(),
            config.genesis.len(),
            manifest_path.display()
        );
        Ok(())
    }
}
