use clap::Args;

use common::fs::FsError;
use common::store::ObjectId;

#[derive(Args, Debug, Clone)]
pub struct Ls {
    /// Current root object ID
    #[arg(long)]
    pub root: ObjectId,

    /// Directory to list (default is '/')
    pub path: Option<String>,

    /// Recurse into subdirectories
    #[arg(long)]
    pub deep: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Ls {
    type Error = LsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let path = self.path.as_deref().unwrap_or("/");
        let entries = if self.deep {
            ctx.fs.ls_deep(self.root, path).await?
        } else {
            ctx.fs.ls(self.root, path).await?
        };

        let mut out = String::new();
        for entry in &entries {
            out.push_str(&format!(
                "{:<4} {:>12}  {}\n",
                entry.kind, entry.size, entry.name
            ));
        }
        out.push_str(&format!("root: {}", self.root));
        Ok(out)
    }
}
