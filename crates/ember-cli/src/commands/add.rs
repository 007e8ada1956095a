use ember_core::db::JournalStore as _;
use ember_core::{JournalEntry, Mood};

use crate::commands::common::{best_effort_push, parse_timestamp, AppContext};
use crate::error::CliError;

pub async fn run_add(
    ctx: &AppContext,
    mood: u8,
    note_parts: &[String],
    image: Option<String>,
    at: Option<&str>,
) -> Result<(), CliError> {
    let session = ctx.current_session()?;

    let mood = Mood::from_score(i64::from(mood))
        .map_err(|invalid| ember_core::Error::InvalidInput(invalid.to_string()))?;
    let occurred_at = match at {
        Some(raw) => parse_timestamp(raw)?,
        None => chrono::Utc::now().timestamp_millis(),
    };

    let mut entry = JournalEntry::new(session.user_id, occurred_at, mood);
    let note = note_parts.join(" ");
    let note = note.trim();
    if !note.is_empty() {
        entry.note = Some(note.to_string());
    }
    entry.image_ref = image;

    ctx.journal.upsert(&entry).await?;
    println!("{}", entry.id);

    best_effort_push(ctx).await;
    Ok(())
}
