//! The editor session: an observable store over everything the user edits.
//!
//! Views mutate the session through its methods and subscribe to
//! [`SessionEvent`]s to know what to redraw. Submission takes a
//! [`SubmissionTicket`], which marks the session busy until it is handed
//! back (or dropped).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{EditorError, ProcessingError};
use crate::handle::{PreviewHandle, PreviewRegistry};
use crate::list::EditableList;
use crate::media::MediaFile;
use crate::overlay::{default_overlays, OverlayField, OverlayList, TextOverlay};
use crate::segment::{AudioField, AudioSegment, SegmentList};

/// The selected video and its preview handle.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSelection {
    file: MediaFile,
    preview: PreviewHandle,
}

impl VideoSelection {
    pub fn file(&self) -> &MediaFile {
        &self.file
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Which editor panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorTab {
    #[default]
    Voiceover,
    Text,
}

/// What changed in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    VideoChanged,
    AudioChanged,
    OverlaysChanged,
    ErrorChanged,
    BusyChanged,
    TabChanged,
}

/// Token returned by [`EditorSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(SessionEvent, &EditorSession) + Send>;

/// Everything a submission reads, frozen at the moment it started.
#[derive(Debug, Clone)]
pub struct SubmissionSnapshot {
    pub video: Option<MediaFile>,
    pub audio: Arc<Vec<AudioSegment>>,
    pub overlays: Arc<Vec<TextOverlay>>,
}

/// Clears the busy flag when dropped.
#[derive(Debug)]
struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// An in-flight submission. Hand it back with
/// [`EditorSession::finish_submission`]; dropping it also clears busy.
#[derive(Debug)]
pub struct SubmissionTicket {
    snapshot: SubmissionSnapshot,
    _guard: BusyGuard,
}

impl SubmissionTicket {
    pub fn snapshot(&self) -> &SubmissionSnapshot {
        &self.snapshot
    }
}

/// Editor state for one session.
pub struct EditorSession {
    handles: PreviewRegistry,
    video: Option<VideoSelection>,
    audio: SegmentList,
    overlays: OverlayList,
    error: Option<ProcessingError>,
    busy: Arc<AtomicBool>,
    tab: EditorTab,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl EditorSession {
    /// Create a session with its own handle registry.
    pub fn new() -> Self {
        Self::with_registry(PreviewRegistry::new())
    }

    /// Create a session that allocates handles from `handles`.
    pub fn with_registry(handles: PreviewRegistry) -> Self {
        Self {
            audio: SegmentList::new(handles.clone()),
            handles,
            video: None,
            overlays: default_overlays(),
            error: None,
            busy: Arc::new(AtomicBool::new(false)),
            tab: EditorTab::default(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // Observation

    /// Register a listener called after every state change.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(SessionEvent, &EditorSession) + Send + 'static,
    ) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&self, event: SessionEvent) {
        for (_, listener) in &self.listeners {
            listener(event, self);
        }
    }

    // Accessors

    pub fn handles(&self) -> &PreviewRegistry {
        &self.handles
    }

    pub fn video(&self) -> Option<&VideoSelection> {
        self.video.as_ref()
    }

    pub fn audio_segments(&self) -> &SegmentList {
        &self.audio
    }

    pub fn text_overlays(&self) -> &EditableList<TextOverlay> {
        &self.overlays
    }

    pub fn error(&self) -> Option<&ProcessingError> {
        self.error.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn active_tab(&self) -> EditorTab {
        self.tab
    }

    // Video

    /// Select a new video, releasing the previous preview handle.
    pub fn select_video(&mut self, file: MediaFile) {
        let preview = self.handles.allocate(&file);
        tracing::debug!(file = file.name(), bytes = file.len(), "Video selected");
        if let Some(old) = self.video.replace(VideoSelection { file, preview }) {
            self.handles.release(&old.preview);
        }
        self.notify(SessionEvent::VideoChanged);
        self.set_error(None);
    }

    /// Drop the video and reset both lists to their defaults.
    pub fn clear_video(&mut self) {
        if let Some(old) = self.video.take() {
            self.handles.release(&old.preview);
        }
        self.audio.reset();
        self.overlays = default_overlays();
        self.notify(SessionEvent::VideoChanged);
        self.notify(SessionEvent::AudioChanged);
        self.notify(SessionEvent::OverlaysChanged);
    }

    // Voiceover segments

    pub fn add_audio_segment(&mut self) {
        self.audio.append();
        self.notify(SessionEvent::AudioChanged);
    }

    pub fn remove_audio_segment(&mut self, index: usize) -> Result<(), EditorError> {
        self.audio.remove_at(index)?;
        self.notify(SessionEvent::AudioChanged);
        Ok(())
    }

    pub fn set_audio_file(&mut self, index: usize, file: MediaFile) -> Result<(), EditorError> {
        self.audio.set_file(index, file)?;
        self.notify(SessionEvent::AudioChanged);
        Ok(())
    }

    pub fn update_audio_field(
        &mut self,
        index: usize,
        field: AudioField,
        raw: &str,
    ) -> Result<(), EditorError> {
        self.audio.update_field(index, field, raw)?;
        self.notify(SessionEvent::AudioChanged);
        Ok(())
    }

    // Text overlays

    pub fn add_text_overlay(&mut self) {
        self.overlays.append(TextOverlay::default());
        self.notify(SessionEvent::OverlaysChanged);
    }

    pub fn remove_text_overlay(&mut self, index: usize) -> Result<(), EditorError> {
        self.overlays.remove_at(index)?;
        self.notify(SessionEvent::OverlaysChanged);
        Ok(())
    }

    pub fn update_text_overlay(
        &mut self,
        index: usize,
        field: OverlayField,
        raw: &str,
    ) -> Result<(), EditorError> {
        self.overlays.update_field(index, field, raw)?;
        self.notify(SessionEvent::OverlaysChanged);
        Ok(())
    }

    // Tabs and errors

    pub fn set_active_tab(&mut self, tab: EditorTab) {
        if self.tab != tab {
            self.tab = tab;
            self.notify(SessionEvent::TabChanged);
        }
    }

    /// Clear the error slot.
    pub fn dismiss_error(&mut self) {
        self.set_error(None);
    }

    fn set_error(&mut self, error: Option<ProcessingError>) {
        if self.error.is_none() && error.is_none() {
            return;
        }
        self.error = error;
        self.notify(SessionEvent::ErrorChanged);
    }

    // Submission

    /// Mark the session busy and freeze the state a submission reads.
    ///
    /// Refused while another ticket is outstanding.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, EditorError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Submission refused: already in progress");
            return Err(EditorError::SubmissionInFlight);
        }

        let ticket = SubmissionTicket {
            snapshot: SubmissionSnapshot {
                video: self.video.as_ref().map(|v| v.file.clone()),
                audio: self.audio.snapshot(),
                overlays: self.overlays.snapshot(),
            },
            _guard: BusyGuard {
                busy: Arc::clone(&self.busy),
            },
        };
        self.notify(SessionEvent::BusyChanged);
        self.set_error(None);
        Ok(ticket)
    }

    /// Hand back a ticket with the submission's outcome.
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<(), ProcessingError>,
    ) {
        drop(ticket);
        if let Err(error) = outcome {
            tracing::warn!(message = error.message(), "Submission failed");
            self.set_error(Some(error));
        }
        self.notify(SessionEvent::BusyChanged);
    }

    // Teardown

    /// Release every preview handle held by the session. Safe to call twice.
    pub fn dispose(&mut self) {
        if let Some(video) = self.video.take() {
            self.handles.release(&video.preview);
        }
        self.audio.reset();
        tracing::debug!(live = self.handles.live_count(), "Editor session disposed");
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("video", &self.video)
            .field("audio", &self.audio)
            .field("overlays", &self.overlays)
            .field("error", &self.error)
            .field("busy", &self.is_busy())
            .field("tab", &self.tab)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
