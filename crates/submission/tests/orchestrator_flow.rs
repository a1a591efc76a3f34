use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use mochi_common::error::{MochiError, MochiResult};
use mochi_editor_model::{
    AudioField, EditorError, EditorSession, MediaFile, OverlayField, ProcessingError,
};
use mochi_submission::{
    BackendResponse, DeliveredFile, DownloadSink, Endpoint, FormPayload, MemoryDownloads,
    OverlayRecord, Orchestrator, ProcessingBackend, SubmissionResult, TEXT_DATA_FIELD,
};

/// Backend that records every call and answers from a script.
#[derive(Default)]
struct ScriptedBackend {
    calls: Mutex<Vec<(Endpoint, FormPayload)>>,
    replies: Mutex<VecDeque<MochiResult<BackendResponse>>>,
}

impl ScriptedBackend {
    fn replying(replies: Vec<MochiResult<BackendResponse>>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
        })
    }

    fn calls(&self) -> Vec<(Endpoint, FormPayload)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ProcessingBackend for ScriptedBackend {
    async fn submit(
        &self,
        endpoint: Endpoint,
        payload: FormPayload,
    ) -> MochiResult<BackendResponse> {
        self.calls.lock().push((endpoint, payload));
        self.replies.lock().pop_front().unwrap_or_else(|| {
            Ok(BackendResponse {
                status: 200,
                body: b"processed".to_vec(),
            })
        })
    }
}

/// Sink whose disk is always full.
struct FullDisk;

#[async_trait]
impl DownloadSink for FullDisk {
    async fn deliver(&self, _file_name: &str, _body: Vec<u8>) -> MochiResult<DeliveredFile> {
        Err(MochiError::download("disk full"))
    }
}

fn ok(body: &str) -> MochiResult<BackendResponse> {
    Ok(BackendResponse {
        status: 200,
        body: body.as_bytes().to_vec(),
    })
}

fn status(code: u16, body: &str) -> MochiResult<BackendResponse> {
    Ok(BackendResponse {
        status: code,
        body: body.as_bytes().to_vec(),
    })
}

fn setup(
    replies: Vec<MochiResult<BackendResponse>>,
) -> (Orchestrator, Arc<ScriptedBackend>, Arc<MemoryDownloads>) {
    let backend = ScriptedBackend::replying(replies);
    let downloads = Arc::new(MemoryDownloads::new());
    let orchestrator = Orchestrator::new(backend.clone(), downloads.clone());
    (orchestrator, backend, downloads)
}

fn session_with_video(name: &str) -> EditorSession {
    let mut session = EditorSession::new();
    session.select_video(MediaFile::from_bytes(name, b"video-bytes".to_vec()));
    session
}

fn wav(name: &str) -> MediaFile {
    MediaFile::from_bytes(name, b"RIFF....WAVE".to_vec())
}

#[tokio::test]
async fn no_video_is_a_precondition_error_without_network() {
    let (orchestrator, backend, downloads) = setup(vec![]);
    let mut session = EditorSession::new();
    session
        .update_text_overlay(0, OverlayField::Text, "Hi")
        .unwrap();

    let result = orchestrator.process(&mut session).await;

    assert_eq!(
        result,
        SubmissionResult::Failed(ProcessingError::video_required())
    );
    assert_eq!(
        session.error().unwrap().message(),
        "Please upload a video first"
    );
    assert!(backend.calls().is_empty());
    assert!(downloads.names().is_empty());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn nothing_to_do_is_a_silent_noop() {
    let (orchestrator, backend, downloads) = setup(vec![]);
    let mut session = session_with_video("clip.mp4");

    let result = orchestrator.process(&mut session).await;

    match result {
        SubmissionResult::Completed(outcome) => assert!(outcome.is_noop()),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(backend.calls().is_empty());
    assert!(downloads.names().is_empty());
    assert!(session.error().is_none());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn single_voiceover_segment_posts_once_and_downloads_once() {
    let (orchestrator, backend, downloads) = setup(vec![ok("with-voice")]);
    let mut session = session_with_video("clip.mp4");
    session.set_audio_file(0, wav("narration.wav")).unwrap();
    session
        .update_audio_field(0, AudioField::Delay, "1.5")
        .unwrap();

    let result = orchestrator.process(&mut session).await;
    assert!(matches!(result, SubmissionResult::Completed(ref o) if o.steps.len() == 1));

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    let (endpoint, payload) = &calls[0];
    assert_eq!(*endpoint, Endpoint::Voiceover);
    assert_eq!(payload.field_names(), ["video", "audio_0", "delay_0"]);
    assert_eq!(payload.file("video").unwrap().name(), "clip.mp4");
    assert_eq!(payload.file("audio_0").unwrap().name(), "narration.wav");
    assert_eq!(payload.text("delay_0"), Some("1.5"));

    assert_eq!(
        downloads.delivered(),
        vec![("processed_clip.mp4".to_string(), b"with-voice".to_vec())]
    );
}

#[tokio::test]
async fn blank_overlays_are_left_out_of_text_data() {
    let (orchestrator, backend, downloads) = setup(vec![]);
    let mut session = session_with_video("clip.mp4");
    session.add_text_overlay();
    for (field, raw) in [
        (OverlayField::Text, "Hi"),
        (OverlayField::StartTime, "0"),
        (OverlayField::Duration, "2"),
        (OverlayField::X, "10"),
        (OverlayField::Y, "20"),
    ] {
        session.update_text_overlay(0, field, raw).unwrap();
    }
    for (field, raw) in [
        (OverlayField::Text, ""),
        (OverlayField::StartTime, "1"),
        (OverlayField::Duration, "1"),
        (OverlayField::X, "0"),
        (OverlayField::Y, "0"),
    ] {
        session.update_text_overlay(1, field, raw).unwrap();
    }

    orchestrator.process(&mut session).await;

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Endpoint::TextOverlay);
    let records: Vec<OverlayRecord> =
        serde_json::from_str(calls[0].1.text(TEXT_DATA_FIELD).unwrap()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "Hi");
    assert_eq!(records[0].position, [10, 20]);
    assert_eq!(downloads.names(), ["processed_clip.mp4"]);
    // The blank overlay is still editable.
    assert_eq!(session.text_overlays().len(), 2);
}

#[tokio::test]
async fn voiceover_failure_skips_text_overlay_step() {
    let (orchestrator, backend, downloads) =
        setup(vec![status(400, r#"{"message":"bad audio"}"#)]);
    let mut session = session_with_video("clip.mp4");
    session.set_audio_file(0, wav("narration.wav")).unwrap();
    session
        .update_text_overlay(0, OverlayField::Text, "Caption")
        .unwrap();

    let result = orchestrator.process(&mut session).await;

    assert_eq!(
        result,
        SubmissionResult::Failed(ProcessingError::new("bad audio"))
    );
    assert_eq!(session.error().unwrap().message(), "bad audio");
    let endpoints: Vec<_> = backend.calls().iter().map(|(e, _)| *e).collect();
    assert_eq!(endpoints, [Endpoint::Voiceover]);
    assert!(downloads.names().is_empty());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn both_steps_run_in_order_and_reuse_the_download_name() {
    let (orchestrator, backend, downloads) = setup(vec![ok("voice"), ok("text")]);
    let mut session = session_with_video("clip.mp4");
    session.set_audio_file(0, wav("a.wav")).unwrap();
    session
        .update_text_overlay(0, OverlayField::Text, "Caption")
        .unwrap();

    let result = orchestrator.process(&mut session).await;
    assert!(matches!(result, SubmissionResult::Completed(ref o) if o.steps.len() == 2));

    let endpoints: Vec<_> = backend.calls().iter().map(|(e, _)| *e).collect();
    assert_eq!(endpoints, [Endpoint::Voiceover, Endpoint::TextOverlay]);
    assert_eq!(
        downloads.delivered(),
        vec![
            ("processed_clip.mp4".to_string(), b"voice".to_vec()),
            ("processed_clip.mp4".to_string(), b"text".to_vec()),
        ]
    );
}

#[tokio::test]
async fn text_step_failure_without_json_uses_status_message() {
    let (orchestrator, _backend, downloads) = setup(vec![status(500, "Internal Server Error")]);
    let mut session = session_with_video("clip.mp4");
    session
        .update_text_overlay(0, OverlayField::Text, "Caption")
        .unwrap();

    orchestrator.process(&mut session).await;

    assert_eq!(
        session.error().unwrap().message(),
        "HTTP error! status: 500"
    );
    assert!(downloads.names().is_empty());
}

#[tokio::test]
async fn transport_failure_is_reported_as_unexpected_error() {
    let (orchestrator, _backend, _downloads) =
        setup(vec![Err(MochiError::transport("connection refused"))]);
    let mut session = session_with_video("clip.mp4");
    session.set_audio_file(0, wav("a.wav")).unwrap();

    let result = orchestrator.process(&mut session).await;

    assert!(matches!(result, SubmissionResult::Failed(_)));
    assert_eq!(
        session.error().unwrap().message(),
        "Transport error: connection refused"
    );
    assert!(!session.is_busy());
}

#[tokio::test]
async fn removed_segments_shift_payload_keys() {
    let (orchestrator, backend, _downloads) = setup(vec![]);
    let mut session = session_with_video("clip.mp4");
    session.add_audio_segment();
    session.add_audio_segment();
    session.set_audio_file(0, wav("a.wav")).unwrap();
    session.set_audio_file(2, wav("c.wav")).unwrap();
    session.remove_audio_segment(0).unwrap();

    orchestrator.process(&mut session).await;

    let calls = backend.calls();
    assert_eq!(calls[0].1.field_names(), ["video", "audio_1", "delay_1"]);
    assert_eq!(calls[0].1.file("audio_1").unwrap().name(), "c.wav");
    assert_eq!(session.handles().live_count(), 2);
}

#[tokio::test]
async fn success_clears_previous_error() {
    let (orchestrator, _backend, _downloads) = setup(vec![status(422, "{}"), ok("done")]);
    let mut session = session_with_video("clip.mp4");
    session.set_audio_file(0, wav("a.wav")).unwrap();

    orchestrator.process(&mut session).await;
    assert_eq!(
        session.error().unwrap().message(),
        "HTTP error! status: 422"
    );

    orchestrator.process(&mut session).await;
    assert!(session.error().is_none());
}

#[tokio::test]
async fn download_failure_reaches_error_slot_and_clears_busy() {
    let backend = ScriptedBackend::replying(vec![ok("with-voice")]);
    let orchestrator = Orchestrator::new(backend.clone(), Arc::new(FullDisk));
    let mut session = session_with_video("clip.mp4");
    session.set_audio_file(0, wav("a.wav")).unwrap();
    session
        .update_text_overlay(0, OverlayField::Text, "Caption")
        .unwrap();

    let result = orchestrator.process(&mut session).await;

    assert_eq!(
        result,
        SubmissionResult::Failed(ProcessingError::new("Download error: disk full"))
    );
    assert_eq!(
        session.error().unwrap().message(),
        "Download error: disk full"
    );
    assert!(!session.is_busy());
    // The text step never starts once the first download fails.
    let endpoints: Vec<_> = backend.calls().iter().map(|(e, _)| *e).collect();
    assert_eq!(endpoints, [Endpoint::Voiceover]);
}

#[tokio::test]
async fn split_submission_keeps_session_observable() {
    let (orchestrator, backend, downloads) = setup(vec![ok("with-voice")]);
    let mut session = session_with_video("clip.mp4");
    session.set_audio_file(0, wav("a.wav")).unwrap();

    let ticket = session.begin_submission().unwrap();
    assert!(session.is_busy());
    assert_eq!(
        session.begin_submission().unwrap_err(),
        EditorError::SubmissionInFlight
    );
    assert_eq!(
        orchestrator.process(&mut session).await,
        SubmissionResult::Refused
    );
    // Edits made while in flight do not reach the running submission.
    session.add_audio_segment();
    session.set_audio_file(1, wav("late.wav")).unwrap();

    let outcome = orchestrator.run(ticket.snapshot()).await;
    session.finish_submission(ticket, outcome.map(|_| ()));

    assert!(!session.is_busy());
    assert!(session.error().is_none());
    assert_eq!(backend.calls().len(), 1);
    assert_eq!(
        backend.calls()[0].1.field_names(),
        ["video", "audio_0", "delay_0"]
    );
    assert_eq!(downloads.names(), ["processed_clip.mp4"]);
}
