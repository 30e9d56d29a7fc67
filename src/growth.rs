use crate::models::{AnnotatedObservation, Observation};

/// Annotate each observation with its year-over-year growth in percent,
/// relative to the previous row of the same country. Input order and length
/// are preserved; nothing is re-sorted here.
///
/// The first row of a country has no prior and stays unannotated. A zero
/// prior value has no defined percentage change, so that figure is `None` as
/// well rather than infinite.
pub fn annotate(rows: &[Observation]) -> Vec<AnnotatedObservation> {
    let mut out = Vec::with_capacity(rows.len());
    for (i, obs) in rows.iter().enumerate() {
        let prior = match i.checked_sub(1).map(|j| &rows[j]) {
            Some(p) if p.country == obs.country => Some(p),
            _ => None,
        };
        let yoy_growth_pct = match prior {
            Some(p) if p.value != 0.0 => Some((obs.value - p.value) / p.value * 100.0),
            _ => None,
        };
        out.push(AnnotatedObservation {
            country: obs.country.clone(),
            year: obs.year,
            value: obs.value,
            yoy_growth_pct,
        });
    }
    out
}
