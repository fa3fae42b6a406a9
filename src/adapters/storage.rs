use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Export sink rooted at the configured output directory.
#[derive(Debug, Clone)]
pub struct ExportDirectory {
    root: PathBuf,
}

impl ExportDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Storage for ExportDirectory {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.root.join(path);

        // 輸出目錄第一次使用時可能還不存在
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}
