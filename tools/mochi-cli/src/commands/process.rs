//! Submit a video to the processing server.

use mochi_common::AppConfig;
use mochi_submission::{Orchestrator, SubmissionResult};

use super::{build_session, EditArgs};

pub async fn run(edit: EditArgs, mut config: AppConfig) -> anyhow::Result<()> {
    edit.apply_overrides(&mut config);

    let mut session = build_session(&edit)?;
    let orchestrator = Orchestrator::from_config(&config)?;

    println!("Processing: {}", edit.video.display());
    println!("  Server: {}", config.server.base_url);
    println!("  Output: {}", config.downloads.dir.display());

    match orchestrator.process(&mut session).await {
        SubmissionResult::Completed(outcome) if outcome.is_noop() => {
            println!("Nothing to do: add --audio or --overlay");
        }
        SubmissionResult::Completed(outcome) => {
            for step in outcome.steps {
                println!(
                    "  {}: saved {} ({} bytes)",
                    step.endpoint,
                    step.download.location.display(),
                    step.download.bytes
                );
            }
            println!("Done.");
        }
        SubmissionResult::Failed(_) => {
            let message = session
                .error()
                .map(|e| e.message().to_string())
                .unwrap_or_default();
            return Err(anyhow::anyhow!("Processing failed: {message}"));
        }
        SubmissionResult::Refused => {
            return Err(anyhow::anyhow!("A submission is already in progress"));
        }
    }

    Ok(())
}
