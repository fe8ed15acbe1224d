use aibro_core::settings::{Settings, SettingsRepository};
use anyhow::Result;

use crate::SettingsAction;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = ctx.store.get_settings().await?;
            println!("reuse_profile = {}", settings.reuse_profile);
        }
        SettingsAction::Set { reuse_profile } => {
            ctx.store.save_settings(&Settings { reuse_profile }).await?;
            println!("reuse_profile = {}", reuse_profile);
        }
    }
    Ok(())
}
