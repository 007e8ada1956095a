use ember_core::db::JournalStore as _;
use ember_core::Mood;

use crate::commands::common::{best_effort_push, resolve_entry, AppContext};
use crate::error::CliError;

pub async fn run_edit(
    ctx: &AppContext,
    id_prefix: &str,
    mood: Option<u8>,
    note: Option<String>,
    image: Option<String>,
) -> Result<(), CliError> {
    let session = ctx.current_session()?;
    let mut entry = resolve_entry(ctx, &session.user_id, id_prefix).await?;

    if let Some(score) = mood {
        entry.mood = Mood::from_score(i64::from(score))
            .map_err(|invalid| ember_core::Error::InvalidInput(invalid.to_string()))?;
    }
    if let Some(note) = note {
        let note = note.trim().to_string();
        entry.note = if note.is_empty() { None } else { Some(note) };
    }
    if let Some(image) = image {
        entry.image_ref = Some(image);
    }

    entry.touch();
    ctx.journal.upsert(&entry).await?;
    println!("Updated {}", entry.id);

    best_effort_push(ctx).await;
    Ok(())
}
