//! Multipart payloads for the two processing endpoints.
//!
//! Payloads are plain data so they can be inspected (and printed by
//! `mochi plan`) before any transport sees them.

use serde::{Deserialize, Serialize};

use mochi_common::error::MochiResult;
use mochi_editor_model::{AudioSegment, MediaFile, TextOverlay};

/// Field name carrying the source video in both payloads.
pub const VIDEO_FIELD: &str = "video";

/// Field name carrying the JSON overlay array.
pub const TEXT_DATA_FIELD: &str = "text_data";

/// Value of a multipart field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(MediaFile),
}

/// One named multipart field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

/// Ordered multipart form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    fields: Vec<FormField>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(FormField {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: MediaFile) {
        self.fields.push(FormField {
            name: name.into(),
            value: FormValue::File(file),
        });
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FormValue::Text(value) => Some(value),
            FormValue::File(_) => None,
        }
    }

    pub fn file(&self, name: &str) -> Option<&MediaFile> {
        match self.get(name)? {
            FormValue::File(file) => Some(file),
            FormValue::Text(_) => None,
        }
    }

    /// Total bytes of file fields.
    pub fn file_bytes(&self) -> usize {
        self.fields
            .iter()
            .map(|f| match &f.value {
                FormValue::File(file) => file.len(),
                FormValue::Text(_) => 0,
            })
            .sum()
    }
}

/// Wire shape of one overlay inside `text_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRecord {
    pub text: String,
    pub start_time: f64,
    pub duration: f64,
    pub position: [i32; 2],
}

impl From<&TextOverlay> for OverlayRecord {
    fn from(overlay: &TextOverlay) -> Self {
        Self {
            text: overlay.text.clone(),
            start_time: overlay.start_time,
            duration: overlay.duration,
            position: [overlay.x, overlay.y],
        }
    }
}

/// Delay as sent in `delay_{i}`: `1.5` → `"1.5"`, `2.0` → `"2"`.
pub fn format_delay(delay: f64) -> String {
    delay.to_string()
}

/// Voiceover form, or `None` when no segment has a file.
///
/// Keys use each segment's current list position, so placeholders leave
/// gaps in the numbering.
pub fn voiceover_payload(video: &MediaFile, segments: &[AudioSegment]) -> Option<FormPayload> {
    if !segments.iter().any(AudioSegment::has_file) {
        return None;
    }

    let mut payload = FormPayload::new();
    payload.push_file(VIDEO_FIELD, video.clone());
    for (index, segment) in segments.iter().enumerate() {
        if let Some(file) = segment.file() {
            payload.push_file(format!("audio_{index}"), file.clone());
            payload.push_text(format!("delay_{index}"), format_delay(segment.delay()));
        }
    }
    Some(payload)
}

/// Overlays that will actually be submitted, in list order.
pub fn overlay_records(overlays: &[TextOverlay]) -> Vec<OverlayRecord> {
    overlays
        .iter()
        .filter(|o| o.has_text())
        .map(OverlayRecord::from)
        .collect()
}

/// Text overlay form, or `None` when every overlay is blank.
pub fn text_overlay_payload(
    video: &MediaFile,
    overlays: &[TextOverlay],
) -> MochiResult<Option<FormPayload>> {
    let records = overlay_records(overlays);
    if records.is_empty() {
        return Ok(None);
    }

    let mut payload = FormPayload::new();
    payload.push_file(VIDEO_FIELD, video.clone());
    payload.push_text(TEXT_DATA_FIELD, serde_json::to_string(&records)?);
    Ok(Some(payload))
}
