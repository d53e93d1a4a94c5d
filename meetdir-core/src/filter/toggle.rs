//! Tag toggling with per-category exclusivity.

use super::{FilterCategory, Filters, MeetingTag};

impl Filters {
    /// Return a copy of these filters with `value` in `category` set to `checked`.
    ///
    /// In exclusive categories every other tag is unchecked, even when the
    /// request unchecks `value`. A value the category doesn't have leaves the
    /// filters unchanged.
    pub fn toggled(&self, category: FilterCategory, value: &str, checked: bool) -> Filters {
        if !self.contains(category, value) {
            return self.clone();
        }

        let mut next = self.clone();
        let tags = next
            .entries
            .get(&category)
            .map(|tags| {
                tags.iter()
                    .map(|tag| toggle_one(tag, category, value, checked))
                    .collect()
            })
            .unwrap_or_default();
        next.entries.insert(category, tags);
        next
    }
}

fn toggle_one(tag: &MeetingTag, category: FilterCategory, value: &str, checked: bool) -> MeetingTag {
    if tag.tag == value {
        MeetingTag {
            tag: tag.tag.clone(),
            checked,
        }
    } else if category.is_exclusive() {
        MeetingTag {
            tag: tag.tag.clone(),
            checked: false,
        }
    } else {
        tag.clone()
    }
}
