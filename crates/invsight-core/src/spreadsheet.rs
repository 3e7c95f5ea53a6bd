//! Spreadsheet dataset reader (xlsx, xlsm, xlsb, xls, ods).
//!
//! The first worksheet is read; its first row is the header. Cells are
//! normalized into the same raw row shape the CSV path deserializes, so both
//! formats share one validation step.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use time::Date;

use crate::loader::{invalid_row, missing_columns, RawRecord, REQUIRED_COLUMNS};
use crate::{InventoryTable, LoadError};

/// Extensions routed to the spreadsheet reader.
pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Julian day of 1899-12-30, day zero of the 1900 date system.
const EXCEL_EPOCH_JULIAN_DAY: i32 = 2_415_019;

/// Serials below this fall before the non-existent 1900-02-29.
const EXCEL_LEAP_BUG_SERIAL: i32 = 61;

/// Largest serial accepted as a date (9999-12-31).
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

pub(crate) fn load_workbook(path: &Path) -> Result<InventoryTable, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|error| LoadError::Workbook {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Workbook {
            path: path.to_path_buf(),
            message: String::from("workbook has no worksheets"),
        })?
        .map_err(|error| LoadError::Workbook {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;

    read_range(&range, path)
}

fn read_range(range: &Range<Data>, path: &Path) -> Result<InventoryTable, LoadError> {
    let header_line = range.start().map_or(1, |(row, _)| u64::from(row) + 1);
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(cell_text).collect())
        .unwrap_or_default();
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

    let missing = missing_columns(&header_refs);
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }
    let columns = REQUIRED_COLUMNS.map(|column| {
        header_refs
            .iter()
            .position(|header| *header == column)
            .unwrap_or_default()
    });

    let mut records = Vec::new();
    for (index, cells) in rows.enumerate() {
        if cells.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let line = header_line + index as u64 + 1;
        let record = raw_record(cells, &columns)
            .and_then(|raw| raw.into_record().map_err(|error| error.to_string()))
            .map_err(|message| invalid_row(path, line, message))?;
        records.push(record);
    }

    Ok(InventoryTable::from_records(records))
}

/// `columns` holds the position of each of [`REQUIRED_COLUMNS`], in order.
fn raw_record(cells: &[Data], columns: &[usize; 8]) -> Result<RawRecord, String> {
    let cell = |slot: usize| cells.get(columns[slot]).unwrap_or(&Data::Empty);

    Ok(RawRecord {
        date: cell_date(cell(0))?,
        product_name: cell_text(cell(1)),
        sales: cell_number(REQUIRED_COLUMNS[2], cell(2))?,
        stock_level: cell_number(REQUIRED_COLUMNS[3], cell(3))?,
        supplier_lead_time: cell_number(REQUIRED_COLUMNS[4], cell(4))?,
        price_per_unit: cell_number(REQUIRED_COLUMNS[5], cell(5))?,
        weather_index: cell_number(REQUIRED_COLUMNS[6], cell(6))?,
        promotion: cell_text(cell(7)),
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            value.trim().to_owned()
        }
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value.as_f64().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn cell_number(column: &str, cell: &Data) -> Result<f64, String> {
    match cell {
        Data::Float(value) => Ok(*value),
        Data::Int(value) => Ok(*value as f64),
        Data::DateTime(value) => Ok(value.as_f64()),
        Data::String(value) => value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("column '{column}': expected a number, found '{value}'")),
        Data::Empty => Err(format!("column '{column}' is empty")),
        other => Err(format!("column '{column}': expected a number, found '{other:?}'")),
    }
}

/// Date cells become ISO text; serial numbers are converted first.
fn cell_date(cell: &Data) -> Result<String, String> {
    let serial = match cell {
        Data::DateTime(value) => value.as_f64(),
        Data::Float(value) => *value,
        Data::Int(value) => *value as f64,
        _ => return Ok(cell_text(cell)),
    };

    excel_serial_date(serial)
        .map(|date| date.to_string())
        .ok_or_else(|| format!("invalid date serial {serial}"))
}

/// Convert a 1900-system serial (fractional part is time of day) to a date.
fn excel_serial_date(serial: f64) -> Option<Date> {
    if !serial.is_finite() || !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }

    let whole = serial.floor() as i32;
    let days = if whole < EXCEL_LEAP_BUG_SERIAL {
        whole + 1
    } else {
        whole
    };
    Date::from_julian_day(EXCEL_EPOCH_JULIAN_DAY + days).ok()
}
