//! Tag filters grouped by category.
//!
//! Every category is stored the same way (an ordered list of checkable tags).
//! Whether a category behaves like a radio group or a checkbox group is a
//! policy applied when a tag is toggled, see [`FilterCategory::is_exclusive`].

mod active;
mod toggle;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use active::active_tags;

/// The facets meetings are grouped by, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterCategory {
    Days,
    Times,
    Formats,
    Types,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 4] = [
        FilterCategory::Days,
        FilterCategory::Times,
        FilterCategory::Formats,
        FilterCategory::Types,
    ];

    /// The key this category is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            FilterCategory::Days => "Days",
            FilterCategory::Times => "Times",
            FilterCategory::Formats => "Formats",
            FilterCategory::Types => "Types",
        }
    }

    /// Parameter name used in share links.
    pub fn query_key(&self) -> &'static str {
        match self {
            FilterCategory::Days => "day",
            FilterCategory::Times => "time",
            FilterCategory::Formats => "format",
            FilterCategory::Types => "type",
        }
    }

    pub fn from_query_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.query_key() == key)
    }

    /// Single-select categories: checking one tag clears its siblings.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, FilterCategory::Days | FilterCategory::Formats)
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Category keys are matched case-sensitively ("Days", not "days").
impl FromStr for FilterCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("Unknown filter category '{}'", s))
    }
}

/// One selectable value within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingTag {
    pub tag: String,
    pub checked: bool,
}

impl MeetingTag {
    pub fn new(tag: impl Into<String>) -> Self {
        MeetingTag {
            tag: tag.into(),
            checked: false,
        }
    }

    /// Slug used to reference this tag in a share link.
    pub fn slug(&self) -> String {
        tag_slug(&self.tag)
    }
}

/// Share-link form of a tag name ("In Person" -> "in-person").
pub fn tag_slug(name: &str) -> String {
    slug::slugify(name)
}

/// Tags per category. Every category always has an entry, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    entries: BTreeMap<FilterCategory, Vec<MeetingTag>>,
}

impl Default for Filters {
    fn default() -> Self {
        Filters {
            entries: FilterCategory::ALL
                .into_iter()
                .map(|c| (c, Vec::new()))
                .collect(),
        }
    }
}

impl Filters {
    /// Build filters from tag names per category, all unchecked.
    /// Duplicate names within a category are collapsed, keeping the first.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = (FilterCategory, Vec<S>)>,
        S: Into<String>,
    {
        let mut filters = Filters::default();
        for (category, names) in tags {
            let entry = filters.entries.entry(category).or_default();
            for name in names {
                let name = name.into();
                if !entry.iter().any(|t| t.tag == name) {
                    entry.push(MeetingTag::new(name));
                }
            }
        }
        filters
    }

    pub fn tags(&self, category: FilterCategory) -> &[MeetingTag] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Categories with their tags, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterCategory, &[MeetingTag])> {
        self.entries.iter().map(|(c, tags)| (*c, tags.as_slice()))
    }

    pub fn contains(&self, category: FilterCategory, value: &str) -> bool {
        self.tags(category).iter().any(|t| t.tag == value)
    }

    pub fn is_checked(&self, category: FilterCategory, value: &str) -> bool {
        self.tags(category)
            .iter()
            .any(|t| t.tag == value && t.checked)
    }

    /// Checked tags of one category, in display order.
    pub fn checked(&self, category: FilterCategory) -> impl Iterator<Item = &MeetingTag> {
        self.tags(category).iter().filter(|t| t.checked)
    }

    /// Find a tag in a category by its share-link slug.
    pub fn find_by_slug(&self, category: FilterCategory, slug: &str) -> Option<&MeetingTag> {
        self.tags(category).iter().find(|t| t.slug() == slug)
    }
}
