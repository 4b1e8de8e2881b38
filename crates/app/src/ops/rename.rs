use clap::Args;

use common::fs::FsError;
use common::store::ObjectId;

#[derive(Args, Debug, Clone)]
pub struct Rename {
    /// Current root object ID
    #[arg(long)]
    pub root: ObjectId,

    /// Path of the entry to rename
    pub path: String,

    /// New entry name (not a path)
    pub new_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Rename {
    type Error = RenameError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let root = ctx.fs.rename(self.root, &self.path, &self.new_name).await?;
        Ok(format!(
            "Renamed {} to {}\nroot: {}",
            self.path, self.new_name, root
        ))
    }
}
