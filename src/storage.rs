use crate::models::AnnotatedObservation;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that spreadsheet software would execute as formulas.
fn guard_cell(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// Save rows as CSV with header. The growth column is left empty where the
/// figure is undefined.
pub fn save_csv<P: AsRef<Path>>(rows: &[AnnotatedObservation], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("country", "year", "value", "yoy_growth_pct"))?;
    for r in rows {
        wtr.serialize((guard_cell(&r.country), r.year, r.value, r.yoy_growth_pct))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save rows as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(rows: &[AnnotatedObservation], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
