use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use meetdir_core::MeetDirError;
use meetdir_core::ics::generate_ics;
use owo_colors::OwoColorize;

use super::{FilterArgs, Settings, open_session, write_output};

pub async fn run(settings: Settings, id: String, output: Option<PathBuf>) -> Result<()> {
    let session = open_session(&settings, &FilterArgs::default()).await?;

    let meeting = session
        .state()
        .find_meeting(&id)
        .ok_or_else(|| MeetDirError::MeetingNotFound(id.clone()))?;

    let ics = generate_ics(meeting, Utc::now())?;
    write_output(output.as_deref(), &ics)?;

    if let Some(path) = output {
        eprintln!("{} {}", "Wrote".green(), path.display());
    }

    Ok(())
}
