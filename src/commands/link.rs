use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::{FilterArgs, Settings, open_session};

pub async fn run(settings: Settings, filters: FilterArgs, open: bool) -> Result<()> {
    if open && settings.config.share_url.is_none() {
        anyhow::bail!(
            "No share_url configured.\n\n\
            Set it in {} to open links in a browser.",
            meetdir_core::config::MeetdirConfig::config_path()?.display()
        );
    }

    let mut session = open_session(&settings, &filters).await?;
    session.render();

    let Some(address) = session.address() else {
        anyhow::bail!("Meetings are not loaded");
    };

    println!("{}", address);

    if open {
        open::that(address).with_context(|| format!("Could not open {}", address))?;
        eprintln!("{}", "Opened in browser".dimmed());
    }

    Ok(())
}
