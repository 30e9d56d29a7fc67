//! cagr_rs
//!
//! A lightweight Rust library for loading, cleaning, and analyzing
//! long-format per-country indicator data (one row = one country-year).
//! Pairs with the `cagr` CLI.
//!
//! ### Features
//! - Load long-format CSV, dropping malformed rows instead of failing
//! - Year-over-year growth annotation per country
//! - Windowed CAGR per country, with top-N ranking and summary statistics
//! - Latest-year snapshots for cross-sectional views
//! - Save filtered results as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use cagr_rs::{Dataset, Selection, YearRange, stats, storage};
//!
//! let data = Dataset::from_path("gdp_per_capita_long.csv")?;
//! let selection = Selection::new(
//!     ["Germany".to_string(), "India".to_string()],
//!     YearRange::new(2000, 2020),
//! );
//! let window = data.select(&selection);
//! let ranked = stats::top_n(&stats::cagr_by_country(&window), 10);
//! storage::save_csv(&window, "gdp_window.csv")?;
//! println!("{:#?}", ranked);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod growth;
pub mod loader;
pub mod models;
pub mod query;
pub mod stats;
pub mod storage;

pub use loader::{Dataset, LoadError};
pub use models::{AnnotatedObservation, CagrResult, Observation, Selection, YearRange};
