use std::borrow::Cow;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner on stderr, so piped output (e.g. `export` to stdout) stays clean.
pub fn create_spinner(message: impl Into<Cow<'static, str>>) -> Result<ProgressBar> {
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"])
        .template("{spinner} {msg}")?;

    let spinner = ProgressBar::new_spinner().with_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}
