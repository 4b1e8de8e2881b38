use clap::Args;

use common::fs::FsError;
use common::store::ObjectId;

#[derive(Args, Debug, Clone)]
pub struct Mkdir {
    /// Current root object ID
    #[arg(long)]
    pub root: ObjectId,

    /// Directory path to create (the parent must exist)
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MkdirError {
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Mkdir {
    type Error = MkdirError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let root = ctx.fs.mkdir(self.root, &self.path).await?;
        Ok(format!("Created {}\nroot: {}", self.path, root))
    }
}
