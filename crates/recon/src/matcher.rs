use crate::model::{CatalogRow, MatchRule};

/// Whether a catalog row is selected by a matching rule.
pub fn row_matches(rule: &MatchRule, row: &CatalogRow) -> bool {
    match rule {
        MatchRule::Marker { column } => row.has_marker(column),
        MatchRule::SubjectCollection(subject) => row.subject_collection == *subject,
        MatchRule::Title(title) => row.title == *title,
    }
}

/// Positions (into `catalog`) of every row selected by `rule`, ascending.
pub fn matching_rows(rule: &MatchRule, catalog: &[CatalogRow]) -> Vec<usize> {
    catalog
        .iter()
        .enumerate()
        .filter(|(_, row)| row_matches(rule, row))
        .map(|(pos, _)| pos)
        .collect()
}
