use aibro_core::catalog::{INDUSTRIES, REGIONS};
use aibro_core::profile::{ProfileRepository, UserProfile};
use anyhow::Result;
use colored::Colorize;

use crate::ProfileAction;
use crate::context::AppContext;
use crate::render;

pub async fn run(ctx: &AppContext, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Show => match ctx.store.get_profile().await? {
            Some(profile) => render::profile(&profile),
            None => println!(
                "{}",
                "No profile yet. Create one with `aibro profile set`.".yellow()
            ),
        },
        ProfileAction::Set {
            region,
            industry,
            employees,
            opening_date,
            revenue,
        } => {
            let profile = UserProfile {
                region,
                industry,
                employees,
                opening_date,
                revenue,
            };
            profile.validate()?;
            ctx.store.save_profile(&profile).await?;
            tracing::info!(region = %profile.region, "Profile saved");
            println!("{}", "Profile saved.".bright_green());
            render::profile(&profile);
        }
        ProfileAction::Options => {
            println!("{}", "Regions:".bold());
            println!("  {}", REGIONS.join(", "));
            println!("{}", "Industries:".bold());
            for industry in INDUSTRIES {
                println!("  {}", industry);
            }
        }
    }
    Ok(())
}
