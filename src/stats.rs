use crate::models::{AnnotatedObservation, CagrResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Aggregate summary over a set of CAGR results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CagrSummary {
    pub count: usize,
    /// `None` when no country produced a valid rate; consumers must render
    /// this as "no data", not as zero.
    pub mean: Option<f64>,
}

/// Compound annual growth rate per country over the rows' window.
///
/// Expects rows grouped by country with years ascending, as the loader and
/// filter produce them. Per country, only the first and last row of the
/// window anchor the computation: this is a headline rate over the chosen
/// window, deliberately not a period-average estimator, and intermediate
/// volatility does not enter into it.
///
/// A country yields a result only when its window spans at least one year
/// and starts from a positive value; otherwise it is absent from the output.
/// Result order follows the per-country order of the input.
pub fn cagr_by_country(rows: &[AnnotatedObservation]) -> Vec<CagrResult> {
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < rows.len() {
        let mut j = i + 1;
        while j < rows.len() && rows[j].country == rows[i].country {
            j += 1;
        }
        let (first, last) = (&rows[i], &rows[j - 1]);
        let span = last.year - first.year;
        if span > 0 && first.value > 0.0 {
            let cagr = (last.value / first.value).powf(1.0 / f64::from(span)) - 1.0;
            out.push(CagrResult {
                country: first.country.clone(),
                cagr,
            });
        }
        i = j;
    }
    out
}

/// Top `n` countries by rate, descending, length `min(n, len)`.
///
/// The sort is stable, so countries with equal rates keep the aggregator's
/// iteration order; there is no secondary sort key.
pub fn top_n(results: &[CagrResult], n: usize) -> Vec<CagrResult> {
    let mut ranked = results.to_vec();
    ranked.sort_by(|a, b| b.cagr.partial_cmp(&a.cagr).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// Mean rate and count over the present results. The mean of an empty set is
/// `None`.
pub fn summary(results: &[CagrResult]) -> CagrSummary {
    let count = results.len();
    let mean = if count > 0 {
        Some(results.iter().map(|r| r.cagr).sum::<f64>() / count as f64)
    } else {
        None
    };
    CagrSummary { count, mean }
}
