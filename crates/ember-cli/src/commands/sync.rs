use ember_core::SkipReason;

use crate::commands::common::AppContext;
use crate::error::CliError;

const fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NoSession => "not signed in",
        SkipReason::Offline => "offline",
    }
}

pub async fn run_sync(ctx: &AppContext, push_only: bool, pull_only: bool) -> Result<(), CliError> {
    let engine = ctx.engine()?;

    if !pull_only {
        let summary = engine.push_all().await?;
        match summary.skipped {
            Some(reason) => println!("push skipped: {}", skip_label(reason)),
            None => println!(
                "pushed {}, deleted {}, failed {}",
                summary.pushed, summary.deleted, summary.failed
            ),
        }
    }

    if !push_only {
        let summary = engine.pull_all().await?;
        match summary.skipped {
            Some(reason) => println!("pull skipped: {}", skip_label(reason)),
            None => println!(
                "pulled {} new, updated {}, unchanged {}",
                summary.added, summary.updated, summary.unchanged
            ),
        }
    }

    Ok(())
}
