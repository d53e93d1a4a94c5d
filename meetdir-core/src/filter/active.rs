//! Active tag projection.

use super::Filters;

/// Checked tag values across all categories, in category order then display order.
///
/// An empty result means no tag constraint.
pub fn active_tags(filters: &Filters) -> Vec<String> {
    filters
        .iter()
        .flat_map(|(_, tags)| tags.iter().filter(|t| t.checked).map(|t| t.tag.clone()))
        .collect()
}
