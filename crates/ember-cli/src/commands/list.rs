use ember_core::db::JournalStore as _;

use crate::commands::common::{entry_to_list_item, format_entry_line, AppContext, EntryListItem};
use crate::error::CliError;

pub async fn run_list(ctx: &AppContext, limit: usize, as_json: bool) -> Result<(), CliError> {
    let session = ctx.current_session()?;
    let entries = ctx.journal.list_active(&session.user_id).await?;
    let entries = &entries[..limit.min(entries.len())];

    if as_json {
        let items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if entries.is_empty() {
        println!("No entries yet. Log one with: ember add --mood 4 \"slept well\"");
    } else {
        for entry in entries {
            println!("{}", format_entry_line(entry));
        }
    }

    Ok(())
}
