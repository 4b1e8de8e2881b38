use clap::Args;

use common::fs::FsError;

#[derive(Args, Debug, Clone)]
pub struct Init {}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let root = ctx.fs.init().await?;
        Ok(format!("Initialized empty filesystem\nroot: {}", root))
    }
}
