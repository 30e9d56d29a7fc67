use cagr_rs::models::AnnotatedObservation;
use cagr_rs::storage;
use std::fs;
use std::path::PathBuf;

fn sample(n: usize) -> Vec<AnnotatedObservation> {
    (0..n)
        .map(|i| AnnotatedObservation {
            country: "Germany".into(),
            year: 2000 + i as i32,
            value: 23_000.0 + i as f64,
            yoy_growth_pct: if i == 0 { None } else { Some(0.5) },
        })
        .collect()
}

#[test]
fn save_csv_and_json() {
    let rows = sample(3);
    let tmp = std::env::temp_dir();

    let csv_path: PathBuf = tmp.join("cagr_rs_test.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("country,year,value,yoy_growth_pct"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());
    fs::remove_file(&csv_path).ok();

    let json_path: PathBuf = tmp.join("cagr_rs_test.json");
    storage::save_json(&rows, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    assert!(v.as_array().unwrap().len() == rows.len());
    fs::remove_file(&json_path).ok();
}

#[test]
fn undefined_growth_serializes_as_empty_csv_field() {
    let rows = sample(2);
    let tmp = std::env::temp_dir().join("cagr_rs_growth_field.csv");
    storage::save_csv(&rows, &tmp).unwrap();

    let mut rdr = csv::Reader::from_path(&tmp).unwrap();
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records[0].get(3), Some(""));
    assert_eq!(records[1].get(3), Some("0.5"));
    fs::remove_file(&tmp).ok();
}

//test if the CSV file is safe and won't include executable formulas
//this is a security issue, as the CSV file can be opened in Excel and the
//formulas can be executed; we prefix the cells with a single quote
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let rows = vec![AnnotatedObservation {
        country: "=HYPERLINK(\"http://evil\")".into(),
        year: 2020,
        value: 1.0,
        yoy_growth_pct: None,
    }];

    let tmp = std::env::temp_dir().join("cagr_rs_csv_injection.csv");
    storage::save_csv(&rows, &tmp).unwrap();

    let mut rdr = csv::Reader::from_path(&tmp).unwrap();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    let cell = row.get(0).unwrap();
    assert!(cell.starts_with('\''), "country not prefixed: {cell}");
    assert!(cell.contains("=HYPERLINK"), "country content changed: {cell}");

    let _ = fs::remove_file(tmp);
}
