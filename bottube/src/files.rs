//! Where upload bytes come from.

use bytes::Bytes;
use std::fmt;
use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;

pub type FileFuture<'a> = Pin<Box<dyn Future<Output = io::Result<FileBytes>> + Send + 'a>>;

/// The contents of a file to upload, along with the name to present it under.
#[derive(Debug, Clone, PartialEq)]
pub struct FileBytes {
    pub bytes: Bytes,
    pub filename: String,
}

/// Resolves a path into the bytes and display name of the file at that path.
pub trait FileSource: fmt::Debug + Send + Sync {
    fn read<'a>(&'a self, path: &'a Path) -> FileFuture<'a>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileSource;

impl FileSource for FsFileSource {
    fn read<'a>(&'a self, path: &'a Path) -> FileFuture<'a> {
        Box::pin(async move {
            let bytes = tokio::fs::read(path).await?;
            Ok(FileBytes {
                bytes: Bytes::from(bytes),
                filename: display_name(path),
            })
        })
    }
}

/// The final path component, which is what the server sees as the upload's filename.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_basename() {
        assert_eq!(display_name(Path::new("/tmp/videos/clip.mp4")), "clip.mp4");
        assert_eq!(display_name(Path::new("clip.mp4")), "clip.mp4");
        assert_eq!(display_name(Path::new("/")), "upload");
    }

    #[tokio::test]
    async fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("bottube-files-{}.bin", std::process::id()));
        tokio::fs::write(&path, b"frames").await.unwrap();

        let file = FsFileSource.read(&path).await.unwrap();
        assert_eq!(&file.bytes[..], b"frames");
        assert_eq!(file.filename, display_name(&path));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = FsFileSource
            .read(Path::new("/definitely/not/here.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
