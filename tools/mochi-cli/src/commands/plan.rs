//! Show the requests `process` would make.

use mochi_common::AppConfig;
use mochi_submission::{Endpoint, FormValue, SubmissionPlan};

use super::{build_session, EditArgs};

pub fn run(edit: EditArgs, mut config: AppConfig) -> anyhow::Result<()> {
    edit.apply_overrides(&mut config);

    let mut session = build_session(&edit)?;
    let ticket = session.begin_submission()?;
    let plan = SubmissionPlan::build(ticket.snapshot());
    session.finish_submission(ticket, Ok(()));
    let plan = plan?;

    if plan.is_empty() {
        println!("Nothing to submit: add --audio or --overlay");
        return Ok(());
    }

    for (n, step) in plan.steps.iter().enumerate() {
        let url = match step.endpoint {
            Endpoint::Voiceover => config.server.voiceover_url(),
            Endpoint::TextOverlay => config.server.text_overlay_url(),
        };
        println!("Step {}: POST {url}", n + 1);
        for field in step.payload.fields() {
            match &field.value {
                FormValue::File(file) => println!(
                    "  {} = <{}, {}, {} bytes>",
                    field.name,
                    file.name(),
                    file.mime(),
                    file.len()
                ),
                FormValue::Text(value) => println!("  {} = {value}", field.name),
            }
        }
        println!(
            "  -> {}",
            config.downloads.dir.join(&plan.download_name).display()
        );
    }

    Ok(())
}
