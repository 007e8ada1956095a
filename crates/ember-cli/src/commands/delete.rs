use ember_core::db::JournalStore as _;

use crate::commands::common::{best_effort_push, resolve_entry, AppContext};
use crate::error::CliError;

pub async fn run_delete(ctx: &AppContext, id_prefix: &str) -> Result<(), CliError> {
    let session = ctx.current_session()?;
    let mut entry = resolve_entry(ctx, &session.user_id, id_prefix).await?;

    ctx.journal.soft_delete(&mut entry).await?;
    println!("Deleted {}", entry.id);

    // The tombstone is cleared from the local store once the deletion
    // reaches the remote side
    best_effort_push(ctx).await;
    Ok(())
}
