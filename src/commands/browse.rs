use anyhow::Result;
use dialoguer::{Input, MultiSelect, Select};
use meetdir_core::predicate::parse_search;
use meetdir_core::query::search_text;
use meetdir_core::{FilterCategory, Session, View};
use owo_colors::OwoColorize;

use super::{FilterArgs, Settings, open_session, parse_timezone_arg, render_context};
use crate::render::render_view;

enum Action {
    Filter(FilterCategory),
    Search,
    Timezone,
    More,
    Quit,
}

pub async fn run(settings: Settings, filters: FilterArgs) -> Result<()> {
    let mut session = open_session(&settings, &filters).await?;

    loop {
        let has_more = show(&mut session);

        let mut actions: Vec<(String, Action)> = FilterCategory::ALL
            .into_iter()
            .map(|c| (format!("Filter {}", c.key()), Action::Filter(c)))
            .collect();
        actions.push(("Search".to_string(), Action::Search));
        actions.push(("Timezone".to_string(), Action::Timezone));
        if has_more {
            actions.push(("Show more".to_string(), Action::More));
        }
        actions.push(("Quit".to_string(), Action::Quit));

        let labels: Vec<&str> = actions.iter().map(|(label, _)| label.as_str()).collect();
        let choice = Select::new()
            .with_prompt("  What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice].1 {
            Action::Filter(category) if category.is_exclusive() => pick_one(&mut session, category)?,
            Action::Filter(category) => pick_many(&mut session, category)?,
            Action::Search => edit_search(&mut session)?,
            Action::Timezone => edit_timezone(&mut session)?,
            Action::More => {
                session.load_more();
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Print the current view and share address. Returns whether more meetings
/// can be shown.
fn show(session: &mut Session) -> bool {
    let ctx = render_context(session);

    let view = session.render();
    let has_more = matches!(view, View::Results { has_more: true, .. });
    println!();
    println!("{}", render_view(&view, &ctx));

    if let Some(address) = session.address() {
        println!("{} {}", "Link:".dimmed(), address.dimmed());
    }
    println!();

    has_more
}

/// Radio-style choice: picking a tag clears its siblings.
fn pick_one(session: &mut Session, category: FilterCategory) -> Result<()> {
    let tags: Vec<(String, bool)> = session
        .state()
        .filters
        .tags(category)
        .iter()
        .map(|t| (t.tag.clone(), t.checked))
        .collect();

    let mut items = vec!["(any)".to_string()];
    items.extend(tags.iter().map(|(tag, _)| tag.clone()));
    let current = tags.iter().position(|(_, checked)| *checked).map_or(0, |i| i + 1);

    let choice = Select::new()
        .with_prompt(format!("  {}", category.key()))
        .items(&items)
        .default(current)
        .interact()?;

    match choice {
        0 => {
            for (tag, checked) in &tags {
                if *checked {
                    session.toggle_tag(category, tag, false);
                }
            }
        }
        i => session.toggle_tag(category, &tags[i - 1].0, true),
    }

    Ok(())
}

fn pick_many(session: &mut Session, category: FilterCategory) -> Result<()> {
    let tags: Vec<(String, bool)> = session
        .state()
        .filters
        .tags(category)
        .iter()
        .map(|t| (t.tag.clone(), t.checked))
        .collect();

    if tags.is_empty() {
        println!("{}", "No tags in this category".dimmed());
        return Ok(());
    }

    let items: Vec<&str> = tags.iter().map(|(tag, _)| tag.as_str()).collect();
    let defaults: Vec<bool> = tags.iter().map(|(_, checked)| *checked).collect();

    let selections = MultiSelect::new()
        .with_prompt(format!("  {} (space to toggle, enter to confirm)", category.key()))
        .items(&items)
        .defaults(&defaults)
        .interact()?;

    for (i, (tag, checked)) in tags.iter().enumerate() {
        let selected = selections.contains(&i);
        if selected != *checked {
            session.toggle_tag(category, tag, selected);
        }
    }

    Ok(())
}

fn edit_search(session: &mut Session) -> Result<()> {
    let current = search_text(&session.state().search);

    let input: String = Input::new()
        .with_prompt("  Search (empty to clear)")
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;

    session.set_search(parse_search(&input));
    Ok(())
}

fn edit_timezone(session: &mut Session) -> Result<()> {
    let input: String = Input::new()
        .with_prompt("  Timezone (IANA id, \"local\", empty for each meeting's own)")
        .with_initial_text(session.state().timezone.clone())
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim();
    if input.is_empty() {
        session.set_timezone("");
        return Ok(());
    }

    match parse_timezone_arg(input) {
        Ok(timezone) => session.set_timezone(timezone),
        Err(e) => println!("{}", e.red()),
    }

    Ok(())
}
