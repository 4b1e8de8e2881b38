use std::path::PathBuf;

use clap::Args;

use common::fs::FsError;
use common::store::ObjectId;

#[derive(Args, Debug, Clone)]
pub struct Download {
    /// Current root object ID
    #[arg(long)]
    pub root: ObjectId,

    /// Source path in the filesystem (files only)
    pub source: String,

    /// Local destination path
    pub destination: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Download {
    type Error = DownloadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let data = ctx.fs.download(self.root, &self.source).await?;
        std::fs::write(&self.destination, &data)?;
        Ok(format!(
            "Downloaded {} ({} bytes) to {}\nroot: {}",
            self.source,
            data.len(),
            self.destination.display(),
            self.root
        ))
    }
}
