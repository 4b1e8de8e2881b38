//! Integration tests for removal

mod common;

use bytes::Bytes;

use ::common::prelude::*;

#[tokio::test]
async fn test_rm_file() {
    let (fs, root) = common::setup_test_env().await;

    let root = fs
        .upload(root, "/f.txt", Bytes::from_static(b"data"))
        .await
        .unwrap();
    let root = fs.rm(root, "/f.txt", false).await.unwrap();

    assert!(fs.ls(root, "/").await.unwrap().is_empty());
    assert!(matches!(
        fs.download(root, "/f.txt").await,
        Err(FsError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_rm_file_frees_blocks() {
    let (fs, root) = common::setup_with_block_size(16).await;

    let root = fs
        .upload(root, "/big", Bytes::from(vec![1u8; 100]))
        .await
        .unwrap();
    // 7 blocks + file node + root
    assert_eq!(fs.store().object_count(), 9);

    let root = fs.rm(root, "/big", false).await.unwrap();
    assert_eq!(fs.store().object_count(), 1);
    assert!(fs.ls(root, "/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rm_nonempty_dir_rejected() {
    let (fs, root) = common::setup_test_env().await;

    let root = fs.mkdir(root, "/a").await.unwrap();
    let root = fs.mkdir(root, "/a/b").await.unwrap();

    let result = fs.rm(root, "/a", false).await;
    assert!(matches!(result, Err(FsError::NotEmpty(path)) if path == "/a"));

    // the failed removal left the tree untouched
    assert_eq!(common::names(&fs, root, "/").await, vec!["a"]);
    assert_eq!(common::names(&fs, root, "/a").await, vec!["b"]);
}

#[tokio::test]
async fn test_rm_recursive() {
    let (fs, root) = common::setup_test_env().await;

    let root = fs.mkdir(root, "/a").await.unwrap();
    let root = fs.mkdir(root, "/a/b").await.unwrap();
    let root = fs
        .upload(root, "/a/b/deep.txt", Bytes::from_static(b"deep"))
        .await
        .unwrap();
    let root = fs
        .upload(root, "/keep.txt", Bytes::from_static(b"keep"))
        .await
        .unwrap();

    let root = fs.rm(root, "/a", true).await.unwrap();

    assert_eq!(common::names(&fs, root, "/").await, vec!["keep.txt"]);
    assert_eq!(
        fs.download(root, "/keep.txt").await.unwrap(),
        Bytes::from_static(b"keep")
    );
    // everything under /a is gone from the medium: root + keep's node + block
    assert_eq!(fs.store().object_count(), 3);
}

#[tokio::test]
async fn test_rm_empty_dir_without_flag() {
    let (fs, root) = common::setup_test_env().await;

    let root = fs.mkdir(root, "/empty").await.unwrap();
    let root = fs.rm(root, "/empty", false).await.unwrap();
    assert!(fs.ls(root, "/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rm_root_rejected() {
    let (fs, root) = common::setup_test_env().await;
    assert!(matches!(
        fs.rm(root, "/", true).await,
        Err(FsError::RootOperation(_))
    ));
}

#[tokio::test]
async fn test_rm_missing_path() {
    let (fs, root) = common::setup_test_env().await;
    assert!(matches!(
        fs.rm(root, "/ghost", false).await,
        Err(FsError::NotFound(_))
    ));
}
