use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Inclusive year interval used to window a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// An inverted range (start > end) selects nothing.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// One cleaned observation (country, year, value). Within a country,
/// observations are ordered by year ascending from load time on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub value: f64,
}

/// An observation plus its year-over-year growth in percent.
///
/// `yoy_growth_pct` is the change relative to the previous row of the same
/// country in its sorted sequence; when the series has year gaps the figure
/// spans the gap. It is `None` for the first row of a country and whenever
/// the preceding value is zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotatedObservation {
    pub country: String,
    pub year: i32,
    pub value: f64,
    pub yoy_growth_pct: Option<f64>,
}

/// Compound annual growth rate for one country over a filtered window.
///
/// `cagr` is a per-year rate (0.034 = 3.4%/yr), not a percentage. Countries
/// without a well-defined rate are omitted entirely rather than carried as
/// zero or NaN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CagrResult {
    pub country: String,
    pub cagr: f64,
}

/// Caller-chosen (countries, year range) pair parameterizing one pipeline
/// run. Not persisted anywhere; build one per query.
#[derive(Debug, Clone)]
pub struct Selection {
    pub countries: AHashSet<String>,
    pub years: YearRange,
}

impl Selection {
    pub fn new(countries: impl IntoIterator<Item = String>, years: YearRange) -> Self {
        Self {
            countries: countries.into_iter().collect(),
            years,
        }
    }

    pub fn matches(&self, country: &str, year: i32) -> bool {
        self.years.contains(year) && self.countries.contains(country)
    }
}
