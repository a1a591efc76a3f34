//! Voiceover segments and the handle-owning segment list.

use std::sync::Arc;

use crate::error::EditorError;
use crate::fields::coerce_seconds;
use crate::handle::{PreviewHandle, PreviewRegistry};
use crate::list::{EditableList, ListEntry};
use crate::media::MediaFile;

/// One audio clip mixed into the video `delay` seconds after the start.
///
/// A segment without a file is a placeholder; it is skipped on submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioSegment {
    file: Option<MediaFile>,
    delay: f64,
    preview: Option<PreviewHandle>,
}

impl AudioSegment {
    pub fn file(&self) -> Option<&MediaFile> {
        self.file.as_ref()
    }

    /// Start delay in seconds.
    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }
}

/// Editable fields of an [`AudioSegment`]. The file is set through
/// [`SegmentList::set_file`] so its handle stays paired with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioField {
    Delay,
}

impl ListEntry for AudioSegment {
    type Field = AudioField;

    fn apply_field(&mut self, field: AudioField, raw: &str) {
        match field {
            AudioField::Delay => self.delay = coerce_seconds(raw),
        }
    }
}

/// Segment list that owns the preview handles of its entries.
///
/// Handles are released when their entry is removed, when its file is
/// replaced, on [`SegmentList::reset`] and when the list is dropped.
#[derive(Debug)]
pub struct SegmentList {
    entries: EditableList<AudioSegment>,
    handles: PreviewRegistry,
}

impl SegmentList {
    /// List holding one empty placeholder segment.
    pub fn new(handles: PreviewRegistry) -> Self {
        Self {
            entries: EditableList::new(vec![AudioSegment::default()]),
            handles,
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<AudioSegment>> {
        self.entries.snapshot()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AudioSegment> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AudioSegment> {
        self.entries.iter()
    }

    /// Whether any segment has a file attached.
    pub fn any_with_file(&self) -> bool {
        self.entries.iter().any(AudioSegment::has_file)
    }

    /// Append an empty segment with zero delay.
    pub fn append(&mut self) {
        self.entries.append(AudioSegment::default());
    }

    /// Remove a segment, releasing its preview handle.
    pub fn remove_at(&mut self, index: usize) -> Result<(), EditorError> {
        let removed = self.entries.remove_at(index)?;
        if let Some(handle) = removed.preview.as_ref() {
            self.handles.release(handle);
        }
        Ok(())
    }

    pub fn update_field(
        &mut self,
        index: usize,
        field: AudioField,
        raw: &str,
    ) -> Result<(), EditorError> {
        self.entries.update_field(index, field, raw)
    }

    /// Attach `file` to a segment, replacing (and releasing) any previous one.
    pub fn set_file(&mut self, index: usize, file: MediaFile) -> Result<(), EditorError> {
        if self.entries.get(index).is_none() {
            return Err(EditorError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }

        let handle = self.handles.allocate(&file);
        let previous = self.entries.modify(index, |segment| {
            segment.file = Some(file);
            segment.preview.replace(handle)
        })?;
        if let Some(old) = previous {
            self.handles.release(&old);
        }
        Ok(())
    }

    /// Back to a single placeholder, releasing every handle.
    pub fn reset(&mut self) {
        let previous = self
            .entries
            .replace_all(vec![AudioSegment::default()]);
        self.release_handles(&previous);
    }

    fn release_handles(&self, segments: &[AudioSegment]) {
        for handle in segments.iter().filter_map(AudioSegment::preview) {
            self.handles.release(handle);
        }
    }
}

impl Drop for SegmentList {
    fn drop(&mut self) {
        let current = self.entries.snapshot();
        self.release_handles(&current);
    }
}
