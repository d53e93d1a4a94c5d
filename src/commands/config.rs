use anyhow::Result;
use meetdir_core::config::MeetdirConfig;
use owo_colors::OwoColorize;

/// Show the effective configuration. With `save`, command-line overrides are
/// written back to the config file.
pub fn run(data_url: Option<String>, per_page: Option<usize>, save: bool) -> Result<()> {
    let config_path = MeetdirConfig::config_path()?;
    let mut config = MeetdirConfig::load()?;

    if let Some(url) = data_url {
        config.data_url = Some(url);
    }
    if let Some(n) = per_page {
        if n == 0 {
            anyhow::bail!("--per-page must be at least 1");
        }
        config.meetings_per_page = n;
    }

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!();
    println!("{}", "Settings".bold());

    let toml = config.to_toml()?;
    if toml.trim().is_empty() {
        println!("  {}", "(all defaults)".dimmed());
    }
    for line in toml.lines() {
        println!("  {}", line);
    }

    if save {
        config.save()?;
        println!();
        println!("{}", "Saved".green());
    }

    Ok(())
}
