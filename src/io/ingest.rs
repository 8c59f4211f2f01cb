//! CSV ingest of daily sales/cost rows.
//!
//! Turns an exported table of `(company, warehouse, date, sales, cost)` rows
//! into `ProfitRecord`s plus the roster of known units.
//!
//! - missing required columns fail the whole file (exit code 2)
//! - bad rows are skipped and reported as `RowError`s; a file with none left
//!   is empty, not an error
//! - grouping and gap-filling live in `trend`
//!
//! A row with an empty `date` registers a unit that had no activity in the
//! period. Profit is never read from the file; it is always `sales - cost`.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{OrgUnit, ProfitRecord, UnitKey};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 7] = [
    "company_id",
    "company_name",
    "warehouse_id",
    "warehouse_name",
    "date",
    "sales",
    "cost",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: records + roster + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<ProfitRecord>,
    /// Every unit seen in the file, with or without activity, in file order.
    pub units: Vec<OrgUnit>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

enum ParsedRow {
    Activity(ProfitRecord),
    Roster(OrgUnit),
}

/// Load a CSV file.
pub fn load_records(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_records(file)
}

/// Parse CSV rows from any reader.
///
/// Only an unreadable header or missing required columns fail. A file without
/// usable rows yields empty `records` and `units`.
pub fn read_records<R: Read>(input: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut units: Vec<OrgUnit> = Vec::new();
    let mut seen: HashSet<UnitKey> = HashSet::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header line, lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let parsed = match parse_row(&record, &header_map) {
            Ok(p) => p,
            Err(message) => {
                row_errors.push(RowError { line, message });
                continue;
            }
        };

        let unit = match &parsed {
            ParsedRow::Activity(r) => &r.unit,
            ParsedRow::Roster(u) => u,
        };
        if seen.insert(unit.key()) {
            units.push(unit.clone());
        }
        if let ParsedRow::Activity(r) = parsed {
            records.push(r);
        }
    }

    Ok(IngestedData {
        records,
        units,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (canonical_column(&normalize_header_name(name)).to_string(), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase().replace([' ', '-'], "_")
}

/// Map the column names of the upstream schema onto ours.
fn canonical_column(name: &str) -> &str {
    match name {
        "warehouse_base_id" => "warehouse_id",
        "target_date" => "date",
        "sales_amount" => "sales",
        "cost_amount" => "cost",
        other => other,
    }
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            2,
            format!("CSV is missing required column(s): {}", missing.join(", ")),
        ))
    }
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<ParsedRow, String> {
    let company_id = parse_id(get_required(record, header_map, "company_id")?, "company_id")?;
    let warehouse_id = parse_id(get_required(record, header_map, "warehouse_id")?, "warehouse_id")?;
    let company_name = get_required(record, header_map, "company_name")?;
    let warehouse_name = get_required(record, header_map, "warehouse_name")?;
    let unit = OrgUnit::new(company_id, company_name, warehouse_id, warehouse_name);

    let Some(date) = get_optional(record, header_map, "date") else {
        return Ok(ParsedRow::Roster(unit));
    };
    let date = parse_date(date)?;
    let sales = parse_amount(get_optional(record, header_map, "sales"), "sales")?;
    let cost = parse_amount(get_optional(record, header_map, "cost"), "cost")?;

    Ok(ParsedRow::Activity(ProfitRecord::new(unit, date, sales, cost)))
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_id(s: &str, name: &str) -> Result<i64, String> {
    s.parse::<i64>()
        .map_err(|_| format!("Invalid `{name}` '{s}': expected an integer."))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!("Invalid date '{s}'. Expected YYYY-MM-DD or YYYY/MM/DD."))
}

/// Empty cells count as no activity.
fn parse_amount(s: Option<&str>, name: &str) -> Result<f64, String> {
    let Some(s) = s else {
        return Ok(0.0);
    };
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{name}` amount '{s}'.")),
    }
}
