pub mod browse;
pub mod config;
pub mod export;
pub mod link;
pub mod list;
pub mod tags;

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use clap::Args;
use meetdir_core::config::MeetdirConfig;
use meetdir_core::filter::{FilterCategory, tag_slug};
use meetdir_core::predicate;
use meetdir_core::query::{SEARCH_KEY, TIMEZONE_KEY};
use meetdir_core::report::TracingReporter;
use meetdir_core::{Phase, Session};
use url::form_urlencoded;

use crate::fetch::DataSource;
use crate::render::{RenderContext, render_view};
use crate::utils::tui::create_spinner;

/// Resolved settings: config file values with command-line overrides applied.
pub struct Settings {
    pub config: MeetdirConfig,
    pub data_url: String,
    pub page_size: usize,
}

impl Settings {
    pub fn resolve(data_url: Option<String>, per_page: Option<usize>) -> Result<Self> {
        let config = MeetdirConfig::load()?;

        let data_url = match data_url {
            Some(url) => url,
            None => config.data_source()?,
        };

        let page_size = per_page.unwrap_or(config.meetings_per_page);
        if page_size == 0 {
            anyhow::bail!("--per-page must be at least 1");
        }

        Ok(Settings {
            config,
            data_url,
            page_size,
        })
    }
}

/// Filter selection shared by the commands that show meetings.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Day of the week (e.g. "monday")
    #[arg(long)]
    pub day: Option<String>,

    /// Time of day: morning, midday, afternoon, evening, night (repeatable)
    #[arg(long = "time")]
    pub times: Vec<String>,

    /// Meeting format: "in person", video or phone
    #[arg(long)]
    pub format: Option<String>,

    /// Meeting type, e.g. open, closed, speaker (repeatable)
    #[arg(long = "type")]
    pub types: Vec<String>,

    /// Search text; "quoted phrases" are matched whole
    #[arg(short, long)]
    pub search: Option<String>,

    /// Show times in this timezone (IANA id, or "local")
    #[arg(short = 'z', long, value_parser = parse_timezone_arg)]
    pub timezone: Option<String>,

    /// Start from a share-link query, e.g. "day=monday&type=open"
    #[arg(long)]
    pub query: Option<String>,
}

impl FilterArgs {
    /// Build the share-link query these arguments describe.
    ///
    /// Explicit flags come after `--query`, so they win in single-select
    /// categories.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if let Some(query) = &self.query {
            for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
                serializer.append_pair(&key, &value);
            }
        }

        let tags = [
            (FilterCategory::Days, self.day.iter().collect::<Vec<_>>()),
            (FilterCategory::Times, self.times.iter().collect()),
            (FilterCategory::Formats, self.format.iter().collect()),
            (FilterCategory::Types, self.types.iter().collect()),
        ];
        for (category, values) in tags {
            if !values.is_empty() {
                let slugs: Vec<String> = values.iter().map(|v| tag_slug(v)).collect();
                serializer.append_pair(category.query_key(), &slugs.join(","));
            }
        }

        if let Some(search) = &self.search {
            serializer.append_pair(SEARCH_KEY, search);
        }

        if let Some(timezone) = &self.timezone {
            serializer.append_pair(TIMEZONE_KEY, timezone);
        }

        serializer.finish()
    }
}

/// Accepts an IANA timezone id or "local" for the system timezone.
fn parse_timezone_arg(s: &str) -> Result<String, String> {
    let name = if s.eq_ignore_ascii_case("local") {
        iana_time_zone::get_timezone().map_err(|e| format!("Could not detect local timezone: {e}"))?
    } else {
        s.to_string()
    };

    name.parse::<Tz>()
        .map(|tz| tz.name().to_string())
        .map_err(|_| format!("Unknown timezone '{}'", s))
}

/// Create a session for the given filters and load the catalog into it.
pub async fn open_session(settings: &Settings, filters: &FilterArgs) -> Result<Session> {
    let mut session = Session::new(settings.page_size, TracingReporter)
        .with_load_options(settings.config.load_options()?)
        .with_share_base(settings.config.share_url.clone().unwrap_or_default())
        .with_initial_query(filters.to_query());

    let source = DataSource::parse(&settings.data_url);

    let spinner = create_spinner("Loading meetings")?;
    session.load(&source).await;
    spinner.finish_and_clear();

    if session.phase() == Phase::Loading {
        let ctx = render_context(&session);
        eprintln!("{}", render_view(&session.render(), &ctx));
        anyhow::bail!("Could not load meetings from {}", settings.data_url);
    }

    Ok(session)
}

/// Rendering context for the session's current state.
pub fn render_context(session: &Session) -> RenderContext {
    let state = session.state();
    RenderContext {
        timezone: predicate::selected_timezone(&state.timezone),
        now: Utc::now(),
        active_tags: state.active_tags(),
        search: state.search.clone(),
    }
}

/// Write `contents` to `path`, or stdout when no path is given.
pub fn write_output(path: Option<&std::path::Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("Could not write {}", path.display())),
        None => {
            print!("{}", contents);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_flags_become_query() {
        let args = FilterArgs {
            day: Some("Monday".to_string()),
            times: vec!["morning".to_string(), "Evening".to_string()],
            format: Some("In Person".to_string()),
            search: Some("big book".to_string()),
            ..Default::default()
        };
        assert_eq!(
            args.to_query(),
            "day=monday&time=morning%2Cevening&format=in-person&search=big+book"
        );
    }

    #[test]
    fn flags_follow_base_query() {
        let args = FilterArgs {
            query: Some("?day=sunday&type=open".to_string()),
            day: Some("friday".to_string()),
            ..Default::default()
        };
        assert_eq!(args.to_query(), "day=sunday&type=open&day=friday");
    }

    #[test]
    fn timezone_arg_validates() {
        assert_eq!(parse_timezone_arg("Europe/Paris"), Ok("Europe/Paris".to_string()));
        assert!(parse_timezone_arg("Moon/Base").is_err());
    }
}
