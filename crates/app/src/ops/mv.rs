use clap::Args;

use common::fs::FsError;
use common::store::ObjectId;

#[derive(Args, Debug, Clone)]
pub struct Mv {
    /// Current root object ID
    #[arg(long)]
    pub root: ObjectId,

    /// Path of the entry to move
    pub source: String,

    /// Destination directory
    pub destination: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MvError {
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Mv {
    type Error = MvError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let root = ctx
            .fs
            .mv(self.root, &self.source, &self.destination)
            .await?;
        Ok(format!(
            "Moved {} into {}\nroot: {}",
            self.source, self.destination, root
        ))
    }
}
