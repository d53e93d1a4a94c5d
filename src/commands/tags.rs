use anyhow::Result;

use super::{FilterArgs, Settings, open_session};
use crate::render::render_filters;

pub async fn run(settings: Settings, filters: FilterArgs) -> Result<()> {
    let session = open_session(&settings, &filters).await?;
    let state = session.state();

    let counts = |category, tag: &str| {
        state
            .meetings
            .iter()
            .filter(|m| m.has_tag(category, tag))
            .count()
    };

    println!("{}", render_filters(&state.filters, counts));

    Ok(())
}
