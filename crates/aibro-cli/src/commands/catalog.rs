use std::collections::HashSet;

use aibro_core::catalog::CatalogFilter;
use aibro_core::saved::SavedPolicyRepository;
use anyhow::Result;
use colored::Colorize;

use crate::CatalogAction;
use crate::context::AppContext;
use crate::render;

pub async fn run(ctx: &AppContext, action: CatalogAction) -> Result<()> {
    let browse = ctx.browse();
    let saved: HashSet<String> = ctx.store.get_saved_ids().await?.into_iter().collect();

    match action {
        CatalogAction::List {
            category,
            region,
            search,
        } => {
            let filter = CatalogFilter {
                category,
                region,
                search,
                ..CatalogFilter::default()
            };
            let items = browse.browse(&filter);
            println!(
                "{}",
                format!("{} of {} announcements", items.len(), browse.catalog().len())
                    .bright_black()
            );
            for a in items {
                println!("{}", render::announcement_line(a, saved.contains(&a.policy_id)));
            }
        }
        CatalogAction::Show { policy_id } => {
            let a = browse.detail(&policy_id)?;
            render::announcement_detail(a, saved.contains(&a.policy_id));
        }
        CatalogAction::EndingSoon { today, days, limit } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let items = browse.ending_soon(today, days, limit);
            if items.is_empty() {
                println!("{}", "Nothing ends soon.".bright_black());
            }
            for a in items {
                println!("{}", render::announcement_line(a, saved.contains(&a.policy_id)));
            }
        }
    }
    Ok(())
}
