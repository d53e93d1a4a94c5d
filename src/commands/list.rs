use anyhow::Result;

use super::{FilterArgs, Settings, open_session, render_context};
use crate::render::render_view;

pub async fn run(settings: Settings, filters: FilterArgs, pages: usize) -> Result<()> {
    let mut session = open_session(&settings, &filters).await?;

    for _ in 1..pages {
        if !session.load_more() {
            break;
        }
    }

    let ctx = render_context(&session);
    println!("{}", render_view(&session.render(), &ctx));

    Ok(())
}
