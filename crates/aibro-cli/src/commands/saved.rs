use anyhow::Result;
use colored::Colorize;

use crate::SavedAction;
use crate::context::AppContext;
use crate::render;

pub async fn run(ctx: &AppContext, action: SavedAction) -> Result<()> {
    let browse = ctx.browse();
    match action {
        SavedAction::List => {
            let items = browse.saved_items().await?;
            if items.is_empty() {
                println!("{}", "No saved announcements.".bright_black());
            }
            for a in items {
                println!("{}", render::announcement_line(a, true));
            }
        }
        SavedAction::Toggle { policy_id } => {
            // Unknown ids are refused so the saved set only holds catalog entries.
            browse.detail(&policy_id)?;
            if browse.toggle_saved(&policy_id).await? {
                println!("{}", format!("★ {} saved", policy_id).yellow());
            } else {
                println!("{}", format!("{} removed from saved", policy_id).bright_black());
            }
        }
    }
    Ok(())
}
