use clap::Args;

use common::fs::FsError;
use common::store::ObjectId;

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// Current root object ID
    #[arg(long)]
    pub root: ObjectId,

    /// Delete a directory and everything beneath it
    #[arg(short, long)]
    pub recursive: bool,

    /// Path to remove
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RmError {
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Rm {
    type Error = RmError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let root = ctx.fs.rm(self.root, &self.path, self.recursive).await?;
        Ok(format!("Removed {}\nroot: {}", self.path, root))
    }
}
