//! Core types for meetdir.
//!
//! This crate holds everything between the raw meeting catalog and what the
//! directory shows:
//! - `loader` turns the catalog into a [`State`] with tag filters per category
//! - `filter` toggles tags and projects the active ones
//! - `predicate` matches meetings against tags, search and timezone
//! - `session` owns the state, loads it once and selects the view
//! - `query` builds and applies share-link query strings

pub mod config;
pub mod error;
pub mod filter;
pub mod ics;
pub mod loader;
pub mod meeting;
pub mod predicate;
pub mod query;
pub mod report;
pub mod session;
pub mod state;

pub use error::{MeetDirError, MeetDirResult};
pub use filter::{FilterCategory, Filters, MeetingTag};
pub use meeting::Meeting;
pub use session::{CatalogSource, Phase, Session, View};
pub use state::State;
