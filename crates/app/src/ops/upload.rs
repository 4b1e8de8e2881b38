use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::Args;

use common::fs::{FsError, TreeSource};
use common::store::ObjectId;

#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// Current root object ID
    #[arg(long)]
    pub root: ObjectId,

    /// Local file or directory to upload
    pub source: PathBuf,

    /// Destination path (including the entry name)
    pub destination: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Upload {
    type Error = UploadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let source = stage_local(&self.source)?;
        let root = ctx
            .fs
            .upload_tree(self.root, &self.destination, source)
            .await?;
        Ok(format!(
            "Uploaded {} to {}\nroot: {}",
            self.source.display(),
            self.destination,
            root
        ))
    }
}

/// Read a local file or directory into a staged tree. Directories are
/// walked eagerly; the engine persists the result bottom-up.
fn stage_local(path: &Path) -> Result<TreeSource, std::io::Error> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            entries.push((name, stage_local(&entry.path())?));
        }
        // read_dir order is platform-dependent
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(TreeSource::Directory(entries))
    } else {
        Ok(TreeSource::File(Bytes::from(std::fs::read(path)?)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stage_local_walks_directories() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.txt"), b"bee").unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub").join("a.txt"), b"aye").unwrap();

        let staged = stage_local(temp.path()).unwrap();
        let TreeSource::Directory(entries) = staged else {
            panic!("expected a directory");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "b.txt");
        assert!(matches!(&entries[0].1, TreeSource::File(data) if data.as_ref() == b"bee"));
        assert_eq!(entries[1].0, "sub");
        assert!(matches!(&entries[1].1, TreeSource::Directory(sub) if sub.len() == 1));
    }

    #[test]
    fn test_stage_local_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        std::fs::write(&file, b"data").unwrap();
        assert!(matches!(
            stage_local(&file).unwrap(),
            TreeSource::File(data) if data.as_ref() == b"data"
        ));
    }

    #[test]
    fn test_stage_local_missing_path() {
        assert!(stage_local(Path::new("/definitely/not/here")).is_err());
    }
}
