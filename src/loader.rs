/// Ingest for **long-format indicator CSV** (one row = one country-year).
///
/// This module turns a raw tabular source into the tidy, ordered rows the
/// rest of the crate assumes, and builds the [`Dataset`] that memoizes the
/// loaded + annotated data for reuse across pipeline runs.
///
/// ### Notes
/// - Header names are matched case-insensitively. `country` and `year` are
///   required; the value column is either named `value` or taken as the
///   first remaining column, so sources like
///   `Country,Year,GDP_per_capita_USD` load unchanged.
/// - A malformed row (missing field, unparseable value, non-integer year) is
///   never an error: it is dropped and counted. Only a file where **nothing**
///   survives cleaning fails, with [`LoadError::EmptyDataset`].
/// - Ordering is established here once: countries in first-seen input order,
///   years ascending within each country. Downstream stages rely on it and
///   never re-sort.
use crate::growth;
use crate::models::{AnnotatedObservation, Observation, Selection, YearRange};
use ahash::AHashMap;
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

/// Load failures. Individual malformed rows are not failures; they are
/// dropped and counted on the resulting [`Dataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open input")]
    Io(#[from] std::io::Error),
    #[error("failed to read csv input")]
    Csv(#[from] csv::Error),
    #[error("no observations survived cleaning ({dropped} rows dropped)")]
    EmptyDataset { dropped: usize },
}

/// Column positions resolved from the header row.
struct Columns {
    country: usize,
    year: usize,
    value: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Option<Self> {
        let pos = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let country = pos("country")?;
        let year = pos("year")?;
        let value = pos("value")
            .or_else(|| (0..headers.len()).find(|&i| i != country && i != year))?;
        Some(Self {
            country,
            year,
            value,
        })
    }
}

/// Years arrive as `2010` or, from float-typed columns, `2010.0`. Anything
/// not integer-valued is malformed.
fn coerce_year(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    if f.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(&f) {
        Some(f as i32)
    } else {
        None
    }
}

/// Per-row discriminated outcome: `Some` for a usable observation, `None`
/// for a row to drop.
fn parse_row(record: &StringRecord, cols: &Columns) -> Option<Observation> {
    let country = record
        .get(cols.country)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    let year = record.get(cols.year).and_then(coerce_year)?;
    let value = record
        .get(cols.value)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())?;
    Some(Observation {
        country: country.to_string(),
        year,
        value,
    })
}

/// Read long-format rows, drop malformed ones, and return the cleaned,
/// ordered observations plus the number of source rows dropped.
///
/// Duplicate (country, year) pairs keep the first occurrence in input order;
/// growth and CAGR math require a unique value per country-year.
pub fn load_observations<R: Read>(reader: R) -> Result<(Vec<Observation>, usize), LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut dropped = 0usize;

    let Some(cols) = Columns::resolve(&headers) else {
        // Without usable columns every row is malformed.
        for _ in rdr.records() {
            dropped += 1;
        }
        return Err(LoadError::EmptyDataset { dropped });
    };

    let mut order: Vec<String> = Vec::new();
    let mut groups: AHashMap<String, Vec<Observation>> = AHashMap::new();
    for record in rdr.records() {
        let Ok(record) = record else {
            dropped += 1;
            continue;
        };
        match parse_row(&record, &cols) {
            Some(obs) => {
                let group = groups.entry(obs.country.clone()).or_insert_with(|| {
                    order.push(obs.country.clone());
                    Vec::new()
                });
                group.push(obs);
            }
            None => dropped += 1,
        }
    }

    let mut out = Vec::new();
    for country in &order {
        let mut group = groups.remove(country).unwrap_or_default();
        // Stable sort: input order survives among equal years, so dedup
        // below keeps the first occurrence.
        group.sort_by_key(|o| o.year);
        let before = group.len();
        group.dedup_by(|a, b| a.year == b.year);
        dropped += before - group.len();
        out.extend(group);
    }

    if out.is_empty() {
        return Err(LoadError::EmptyDataset { dropped });
    }
    debug!("loaded {} observations ({} rows dropped)", out.len(), dropped);
    Ok((out, dropped))
}

/// Contiguous slice of rows belonging to one country.
#[derive(Debug, Clone)]
struct CountryRun {
    country: String,
    span: Range<usize>,
}

/// The loaded, annotated dataset: an invalidation-free read-only cache.
///
/// Built once per source, then passed by shared reference to every query; no
/// pipeline stage mutates it, so it can be shared across threads without
/// locks. The per-country run table is built here so that filtering and
/// aggregation never re-scan to group rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: String,
    rows: Vec<AnnotatedObservation>,
    runs: Vec<CountryRun>,
    by_country: AHashMap<String, usize>,
    dropped: usize,
}

impl Dataset {
    /// Load from any reader. `source` labels the cache (a path, a URL, a
    /// test fixture name).
    pub fn from_reader<R: Read>(source: impl Into<String>, reader: R) -> Result<Self, LoadError> {
        let (observations, dropped) = load_observations(reader)?;
        let rows = growth::annotate(&observations);

        let mut runs: Vec<CountryRun> = Vec::new();
        let mut by_country = AHashMap::new();
        for (i, row) in rows.iter().enumerate() {
            if let Some(run) = runs.last_mut() {
                if run.country == row.country {
                    run.span.end = i + 1;
                    continue;
                }
            }
            by_country.insert(row.country.clone(), runs.len());
            runs.push(CountryRun {
                country: row.country.clone(),
                span: i..i + 1,
            });
        }

        Ok(Self {
            source: source.into(),
            rows,
            runs,
            by_country,
            dropped,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(&path)?;
        Self::from_reader(path.as_ref().display().to_string(), file)
    }

    /// Identity of the source this cache was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All annotated rows: first-seen country order, years ascending within
    /// each country.
    pub fn rows(&self) -> &[AnnotatedObservation] {
        &self.rows
    }

    /// Number of source rows dropped during cleaning.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Countries in first-seen input order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.runs.iter().map(|r| r.country.as_str())
    }

    /// One country's full annotated series, years ascending.
    pub fn series(&self, country: &str) -> Option<&[AnnotatedObservation]> {
        let run = &self.runs[*self.by_country.get(country)?];
        Some(&self.rows[run.span.clone()])
    }

    /// Min/max year across the whole dataset.
    pub fn year_range(&self) -> Option<YearRange> {
        let min = self.rows.iter().map(|r| r.year).min()?;
        let max = self.rows.iter().map(|r| r.year).max()?;
        Some(YearRange::new(min, max))
    }

    /// Index-backed equivalent of [`crate::query::filter`] over the full
    /// dataset: walks only the selected countries' runs and binary-searches
    /// the year window inside each. Output order matches `filter` exactly.
    pub fn select(&self, selection: &Selection) -> Vec<AnnotatedObservation> {
        let mut out = Vec::new();
        if selection.years.is_inverted() {
            return out;
        }
        for run in &self.runs {
            if !selection.countries.contains(&run.country) {
                continue;
            }
            let rows = &self.rows[run.span.clone()];
            let lo = rows.partition_point(|r| r.year < selection.years.start);
            let hi = rows.partition_point(|r| r.year <= selection.years.end);
            out.extend_from_slice(&rows[lo..hi]);
        }
        out
    }
}
