//! Preview handles.
//!
//! Every file the editor holds (the video and each voiceover clip) gets one
//! revocable handle that a view can use to preview it locally. The registry
//! tracks which handles are live so ownership bugs show up as counts.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::media::MediaFile;

/// Reference to a live (or revoked) preview of a media file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle {
    id: u64,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// URL form handed to views, e.g. `mochi-preview:7`.
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mochi-preview:{}", self.id)
    }
}

#[derive(Debug)]
struct LiveHandle {
    file: MediaFile,
}

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    live: HashMap<u64, LiveHandle>,
    released: u64,
}

/// Allocates and revokes preview handles.
///
/// Cloning yields another view of the same registry.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh handle for `file`.
    pub fn allocate(&self, file: &MediaFile) -> PreviewHandle {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.live.insert(id, LiveHandle { file: file.clone() });
        tracing::trace!(id, file = file.name(), "Allocated preview handle");
        PreviewHandle { id }
    }

    /// Revoke a handle. Returns `false` if it was already revoked.
    pub fn release(&self, handle: &PreviewHandle) -> bool {
        let mut state = self.state.lock();
        match state.live.remove(&handle.id) {
            Some(entry) => {
                state.released += 1;
                tracing::trace!(id = handle.id, file = entry.file.name(), "Released preview handle");
                true
            }
            None => false,
        }
    }

    /// The file behind a live handle.
    pub fn resolve(&self, handle: &PreviewHandle) -> Option<MediaFile> {
        self.state
            .lock()
            .live
            .get(&handle.id)
            .map(|entry| entry.file.clone())
    }

    pub fn is_live(&self, handle: &PreviewHandle) -> bool {
        self.state.lock().live.contains_key(&handle.id)
    }

    /// Number of handles currently allocated and not yet released.
    pub fn live_count(&self) -> usize {
        self.state.lock().live.len()
    }

    /// Total number of successful releases since the registry was created.
    pub fn released_count(&self) -> u64 {
        self.state.lock().released
    }
}
