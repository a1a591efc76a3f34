pub mod config;
pub mod plan;
pub mod process;

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use mochi_common::AppConfig;
use mochi_editor_model::{AudioField, EditorSession, MediaFile, OverlayField};

/// Editor inputs shared by `process` and `plan`.
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Video file to process
    pub video: PathBuf,

    /// Voiceover clip, optionally with a start delay in seconds (`voice.wav@1.5`)
    #[arg(long = "audio", value_name = "PATH[@DELAY]")]
    pub audio: Vec<String>,

    /// Text overlay with optional timing and position (`Hello@0,2,100,100`).
    /// The suffix is only split off when all four numbers are given, so
    /// `Call me @5` is kept as text
    #[arg(long = "overlay", value_name = "TEXT[@START,DURATION,X,Y]")]
    pub overlays: Vec<String>,

    /// Processing server base URL (overrides config)
    #[arg(long)]
    pub server: Option<String>,

    /// Directory processed videos are saved into (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl EditArgs {
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(ref server) = self.server {
            config.server.base_url = server.clone();
        }
        if let Some(ref dir) = self.output {
            config.downloads.dir = dir.clone();
        }
    }
}

/// Populate an editor session the way the form would: pick the video, fill
/// the placeholder entries first, then append.
pub fn build_session(edit: &EditArgs) -> anyhow::Result<EditorSession> {
    let mut session = EditorSession::new();

    let video = MediaFile::from_path(&edit.video)
        .with_context(|| format!("Failed to load video {}", edit.video.display()))?;
    session.select_video(video);

    for (index, arg) in edit.audio.iter().enumerate() {
        let (path, delay) = split_timing(arg);
        if index >= session.audio_segments().len() {
            session.add_audio_segment();
        }
        let clip = MediaFile::from_path(path)
            .with_context(|| format!("Failed to load voiceover {path}"))?;
        session.set_audio_file(index, clip)?;
        if let Some(delay) = delay {
            session.update_audio_field(index, AudioField::Delay, delay)?;
        }
    }

    for (index, arg) in edit.overlays.iter().enumerate() {
        let (text, timing) = split_overlay(arg);
        if index >= session.text_overlays().len() {
            session.add_text_overlay();
        }
        session.update_text_overlay(index, OverlayField::Text, text)?;
        if let Some(timing) = timing {
            let fields = [
                OverlayField::StartTime,
                OverlayField::Duration,
                OverlayField::X,
                OverlayField::Y,
            ];
            for (field, raw) in fields.into_iter().zip(timing.split(',')) {
                session.update_text_overlay(index, field, raw)?;
            }
        }
    }

    Ok(session)
}

/// Split an overlay at its last `@` when the suffix is exactly
/// `START,DURATION,X,Y`, four numbers. Otherwise the whole argument is text.
fn split_overlay(arg: &str) -> (&str, Option<&str>) {
    match split_timing(arg) {
        (text, Some(timing))
            if timing.split(',').count() == 4
                && timing.split(',').all(|n| n.trim().parse::<f64>().is_ok()) =>
        {
            (text, Some(timing))
        }
        _ => (arg, None),
    }
}

/// Split `value@numbers` at the last `@` when the suffix looks numeric
/// (digits, signs, dots, commas). Otherwise the whole argument is the value.
fn split_timing(arg: &str) -> (&str, Option<&str>) {
    match arg.rsplit_once('@') {
        Some((head, tail))
            if !head.is_empty()
                && !tail.trim().is_empty()
                && tail
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | ' ')) =>
        {
            (head, Some(tail))
        }
        _ => (arg, None),
    }
}
