//! Destinations for processed videos.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use mochi_common::error::{MochiError, MochiResult};

/// Name a processed video is offered under.
pub fn download_name(original: &str) -> String {
    format!("processed_{original}")
}

/// Where a delivered download ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredFile {
    /// Name the download was offered under.
    pub requested_name: String,

    /// Where it was stored. May differ from `requested_name` after
    /// collision suffixing.
    pub location: PathBuf,

    pub bytes: usize,
}

/// Receives processed video bodies.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn deliver(&self, file_name: &str, body: Vec<u8>) -> MochiResult<DeliveredFile>;
}

/// Saves downloads into a directory, suffixing ` (1)`, ` (2)`, ... when a
/// name is already taken.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloads {
    async fn deliver(&self, file_name: &str, body: Vec<u8>) -> MochiResult<DeliveredFile> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            MochiError::download(format!("Failed to create {}: {e}", self.dir.display()))
        })?;

        let bytes = body.len();
        let mut attempt = 0u32;
        loop {
            let candidate = self.dir.join(numbered_name(file_name, attempt));
            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await;
            match opened {
                Ok(mut file) => {
                    use tokio::io::AsyncWriteExt;
                    file.write_all(&body).await.map_err(|e| {
                        MochiError::download(format!(
                            "Failed to write {}: {e}",
                            candidate.display()
                        ))
                    })?;
                    file.flush().await?;
                    tracing::info!(path = %candidate.display(), bytes, "Saved processed video");
                    return Ok(DeliveredFile {
                        requested_name: file_name.to_string(),
                        location: candidate,
                        bytes,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => {
                    return Err(MochiError::download(format!(
                        "Failed to create {}: {e}",
                        candidate.display()
                    )))
                }
            }
        }
    }
}

/// `name` for attempt 0, otherwise `stem (n).ext`.
fn numbered_name(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({attempt}){}", &name[..dot], &name[dot..]),
        _ => format!("{name} ({attempt})"),
    }
}

/// Keeps downloads in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryDownloads {
    delivered: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryDownloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names delivered so far, in order.
    pub fn names(&self) -> Vec<String> {
        self.delivered
            .lock()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Everything delivered so far, in order.
    pub fn delivered(&self) -> Vec<(String, Vec<u8>)> {
        self.delivered.lock().clone()
    }
}

#[async_trait]
impl DownloadSink for MemoryDownloads {
    async fn deliver(&self, file_name: &str, body: Vec<u8>) -> MochiResult<DeliveredFile> {
        let bytes = body.len();
        self.delivered.lock().push((file_name.to_string(), body));
        Ok(DeliveredFile {
            requested_name: file_name.to_string(),
            location: PathBuf::from(file_name),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_name() {
        assert_eq!(download_name("clip.mp4"), "processed_clip.mp4");
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("processed_a.mp4", 0), "processed_a.mp4");
        assert_eq!(numbered_name("processed_a.mp4", 2), "processed_a (2).mp4");
        assert_eq!(numbered_name("noext", 1), "noext (1)");
        assert_eq!(numbered_name(".hidden", 1), ".hidden (1)");
    }

    #[tokio::test]
    async fn test_directory_downloads_disambiguate_collisions() {
        let dir = std::env::temp_dir().join("mochi_test_directory_downloads");
        let _ = std::fs::remove_dir_all(&dir);
        let sink = DirectoryDownloads::new(&dir);

        let first = sink
            .deliver("processed_clip.mp4", b"one".to_vec())
            .await
            .unwrap();
        let second = sink
            .deliver("processed_clip.mp4", b"two".to_vec())
            .await
            .unwrap();

        assert_eq!(first.location, dir.join("processed_clip.mp4"));
        assert_eq!(second.location, dir.join("processed_clip (1).mp4"));
        assert_eq!(second.requested_name, "processed_clip.mp4");
        assert_eq!(std::fs::read(&first.location).unwrap(), b"one");
        assert_eq!(std::fs::read(&second.location).unwrap(), b"two");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_memory_downloads_record_order() {
        let sink = MemoryDownloads::new();
        sink.deliver("a", vec![1]).await.unwrap();
        sink.deliver("b", vec![2, 3]).await.unwrap();
        assert_eq!(sink.names(), ["a", "b"]);
        assert_eq!(sink.delivered()[1].1, vec![2, 3]);
    }
}
