use crate::models::{AnnotatedObservation, Selection};

/// Keep the rows whose country is selected and whose year falls inside the
/// inclusive range, preserving input order. An empty country set or an
/// inverted range yields an empty result, never an error.
pub fn filter(rows: &[AnnotatedObservation], selection: &Selection) -> Vec<AnnotatedObservation> {
    if selection.countries.is_empty() || selection.years.is_inverted() {
        return Vec::new();
    }
    rows.iter()
        .filter(|r| selection.matches(&r.country, r.year))
        .cloned()
        .collect()
}

/// Latest year present in `rows`, if any.
pub fn latest_year(rows: &[AnnotatedObservation]) -> Option<i32> {
    rows.iter().map(|r| r.year).max()
}

/// Cross-sectional slice: the rows at the latest year present in `rows`.
/// Feeds map/pie style views; an empty input yields an empty snapshot.
pub fn snapshot(rows: &[AnnotatedObservation]) -> Vec<AnnotatedObservation> {
    match latest_year(rows) {
        Some(latest) => rows.iter().filter(|r| r.year == latest).cloned().collect(),
        None => Vec::new(),
    }
}
