//! In-memory media files picked by the user.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use mochi_common::error::{MochiError, MochiResult};

/// A user-supplied file: its original name, a MIME type and the raw bytes.
///
/// Cloning is cheap; the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    name: String,
    mime: String,
    data: Arc<[u8]>,
}

impl MediaFile {
    /// Wrap bytes already in memory. The MIME type is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let mime = guess_mime(&name).to_string();
        Self {
            name,
            mime,
            data: data.into(),
        }
    }

    /// Read a file from disk. The file name (without directories) becomes
    /// the media name.
    pub fn from_path(path: impl AsRef<Path>) -> MochiResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MochiError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| MochiError::media(format!("{} has no file name", path.display())))?;
        let data = std::fs::read(path)?;
        Ok(Self::from_bytes(name, data))
    }

    /// Override the guessed MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.data.len())
            .finish()
    }
}

/// MIME type for common video and audio extensions.
pub fn guess_mime(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}
