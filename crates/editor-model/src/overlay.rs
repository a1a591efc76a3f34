//! Timed, positioned text overlays.

use std::str::FromStr;

use crate::fields::{coerce_pixels, coerce_seconds};
use crate::list::{EditableList, ListEntry};

/// A caption drawn on the video between `start_time` and
/// `start_time + duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    /// Caption text. Blank captions stay in the list but are never submitted.
    pub text: String,

    /// Seconds from the start of the video.
    pub start_time: f64,

    /// Seconds the caption stays visible.
    pub duration: f64,

    /// Pixels from the left edge.
    pub x: i32,

    /// Pixels from the top edge.
    pub y: i32,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            text: String::new(),
            start_time: 0.0,
            duration: 2.0,
            x: 100,
            y: 100,
        }
    }
}

impl TextOverlay {
    /// Whether the overlay has text worth submitting.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Editable fields of a [`TextOverlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayField {
    Text,
    StartTime,
    Duration,
    X,
    Y,
}

impl ListEntry for TextOverlay {
    type Field = OverlayField;

    fn apply_field(&mut self, field: OverlayField, raw: &str) {
        match field {
            OverlayField::Text => self.text = raw.to_string(),
            OverlayField::StartTime => self.start_time = coerce_seconds(raw),
            OverlayField::Duration => self.duration = coerce_seconds(raw),
            OverlayField::X => self.x = coerce_pixels(raw),
            OverlayField::Y => self.y = coerce_pixels(raw),
        }
    }
}

impl FromStr for OverlayField {
    type Err = String;

    /// Accepts both `startTime` and `start_time` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "startTime" | "start_time" => Ok(Self::StartTime),
            "duration" => Ok(Self::Duration),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            other => Err(format!("Unknown overlay field: {other}")),
        }
    }
}

/// The overlay list starts with one empty caption.
pub type OverlayList = EditableList<TextOverlay>;

/// Fresh overlay list holding a single default entry.
pub fn default_overlays() -> OverlayList {
    EditableList::new(vec![TextOverlay::default()])
}
