//! The directory session: owns the current state and decides what to show.
//!
//! A session starts in the loading phase and performs one catalog fetch.
//! Success moves it to the loaded phase for good; failure is reported and the
//! session stays loading. Every update replaces the state with a new snapshot.

use std::future::Future;

use crate::error::MeetDirResult;
use crate::filter::FilterCategory;
use crate::loader::{self, LoadOptions};
use crate::meeting::Meeting;
use crate::predicate;
use crate::query;
use crate::report::ErrorReporter;
use crate::state::{self, State};

/// Where the raw catalog comes from.
pub trait CatalogSource {
    fn fetch(&self) -> impl Future<Output = MeetDirResult<serde_json::Value>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Loaded,
}

/// What the directory shows for the current state.
#[derive(Debug)]
pub enum View<'a> {
    Loading,
    NoResults {
        active_tags: Vec<String>,
    },
    Results {
        /// The visible page(s) of filtered meetings.
        meetings: Vec<&'a Meeting>,
        /// Number of filtered meetings, shown or not.
        total: usize,
        has_more: bool,
        active_tags: Vec<String>,
    },
}

pub struct Session {
    state: State,
    page_size: usize,
    options: LoadOptions,
    reporter: Box<dyn ErrorReporter + Send + Sync>,
    load_started: bool,
    initial_query: Option<String>,
    share_base: String,
    address: Option<String>,
}

impl Session {
    pub fn new(page_size: usize, reporter: impl ErrorReporter + Send + Sync + 'static) -> Self {
        Session {
            state: State::initial(page_size),
            page_size,
            options: LoadOptions::default(),
            reporter: Box::new(reporter),
            load_started: false,
            initial_query: None,
            share_base: String::new(),
            address: None,
        }
    }

    pub fn with_load_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Query applied once the catalog has loaded, e.g. from a shared link.
    pub fn with_initial_query(mut self, query: impl Into<String>) -> Self {
        self.initial_query = Some(query.into());
        self
    }

    /// Base address share links are built on.
    pub fn with_share_base(mut self, base: impl Into<String>) -> Self {
        self.share_base = base.into();
        self
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn phase(&self) -> Phase {
        if self.state.loading {
            Phase::Loading
        } else {
            Phase::Loaded
        }
    }

    /// Address of the last rendered view, once loaded.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Claim the one load attempt. Returns false if it was already claimed.
    pub fn begin_load(&mut self) -> bool {
        if self.load_started {
            return false;
        }
        self.load_started = true;
        true
    }

    /// Fetch and load the catalog, once per session.
    pub async fn load<S: CatalogSource>(&mut self, source: &S) {
        if !self.begin_load() {
            tracing::debug!("catalog load already attempted");
            return;
        }

        let result = source
            .fetch()
            .await
            .and_then(|payload| loader::load(payload, &self.options));
        self.finish_load(result);
    }

    /// Publish the result of the load attempt.
    pub fn finish_load(&mut self, result: MeetDirResult<State>) {
        if !self.state.loading {
            return;
        }

        match result {
            Ok(loaded) => {
                let mut next = loaded.with_limit(self.page_size);
                if let Some(query) = self.initial_query.take() {
                    next = query::apply_query(&next, &query);
                }
                tracing::info!(meetings = next.meetings.len(), "meetings loaded");
                self.state = next;
            }
            Err(e) => self.reporter.capture(&e),
        }
    }

    pub fn toggle_tag(&mut self, category: FilterCategory, value: &str, checked: bool) {
        self.state = self.state.toggle_tag(category, value, checked);
    }

    pub fn set_search(&mut self, search: Vec<String>) {
        self.state = self.state.with_search(search);
    }

    pub fn set_timezone(&mut self, timezone: impl Into<String>) {
        self.state = self.state.with_timezone(timezone);
    }

    /// Show another page if the filtered list has more. Returns whether it grew.
    pub fn load_more(&mut self) -> bool {
        let active = self.state.active_tags();
        let total = predicate::filter(&self.state, &active).len();
        if !self.state.has_more(total) {
            return false;
        }

        self.state = self.state.load_more(self.page_size);
        tracing::debug!(limit = self.state.limit, total, "loaded more meetings");
        true
    }

    /// Compute the view for the current state and sync the share address.
    pub fn render(&mut self) -> View<'_> {
        if self.state.loading {
            return View::Loading;
        }

        self.address = Some(query::share_address(&self.share_base, &self.state));

        let active_tags = self.state.active_tags();
        let filtered = predicate::filter(&self.state, &active_tags);

        if filtered.is_empty() {
            return View::NoResults { active_tags };
        }

        let total = filtered.len();
        let has_more = self.state.has_more(total);
        let meetings = state::visible(&filtered, self.state.limit).to_vec();

        View::Results {
            meetings,
            total,
            has_more,
            active_tags,
        }
    }
}
