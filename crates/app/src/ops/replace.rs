use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use common::fs::FsError;
use common::store::ObjectId;

#[derive(Args, Debug, Clone)]
pub struct Replace {
    /// Current root object ID
    #[arg(long)]
    pub root: ObjectId,

    /// Local file with the new content
    pub source: PathBuf,

    /// Existing file in the filesystem to replace
    pub destination: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Replace {
    type Error = ReplaceError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let data = Bytes::from(std::fs::read(&self.source)?);
        let root = ctx.fs.replace(self.root, &self.destination, data).await?;
        Ok(format!("Replaced {}\nroot: {}", self.destination, root))
    }
}
