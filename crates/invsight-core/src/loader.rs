//! Dataset loader.
//!
//! Parses the sales/inventory export (CSV or a spreadsheet workbook) into a
//! typed [`InventoryTable`]. Required columns (extra columns are ignored):
//!   Date, Product_Name, Sales, Stock_Level, Supplier_Lead_Time,
//!   Price_Per_Unit, Weather_Index, Promotion

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::spreadsheet::{self, SPREADSHEET_EXTENSIONS};
use crate::{
    parse_record_date, InventoryTable, LoadError, ProductName, PromotionStatus, SalesRecord,
    ValidationError,
};

/// Columns the dataset must carry, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Date",
    "Product_Name",
    "Sales",
    "Stock_Level",
    "Supplier_Lead_Time",
    "Price_Per_Unit",
    "Weather_Index",
    "Promotion",
];

const CSV_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// One dataset row before validation, shared by the CSV and spreadsheet paths.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(rename = "Date")]
    pub(crate) date: String,
    #[serde(rename = "Product_Name")]
    pub(crate) product_name: String,
    #[serde(rename = "Sales")]
    pub(crate) sales: f64,
    #[serde(rename = "Stock_Level")]
    pub(crate) stock_level: f64,
    #[serde(rename = "Supplier_Lead_Time")]
    pub(crate) supplier_lead_time: f64,
    #[serde(rename = "Price_Per_Unit")]
    pub(crate) price_per_unit: f64,
    #[serde(rename = "Weather_Index")]
    pub(crate) weather_index: f64,
    #[serde(rename = "Promotion")]
    pub(crate) promotion: String,
}

impl RawRecord {
    pub(crate) fn into_record(self) -> Result<SalesRecord, ValidationError> {
        SalesRecord::new(
            parse_record_date(&self.date)?,
            ProductName::parse(&self.product_name)?,
            self.sales,
            self.stock_level,
            self.supplier_lead_time,
            self.price_per_unit,
            self.weather_index,
            PromotionStatus::from_flag(&self.promotion)?,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetFormat {
    Csv,
    Spreadsheet,
}

impl DatasetFormat {
    /// Files without an extension are read as CSV.
    fn from_path(path: &Path) -> Result<Self, LoadError> {
        let Some(extension) = path
            .extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
        else {
            return Ok(Self::Csv);
        };

        if CSV_EXTENSIONS.contains(&extension.as_str()) {
            Ok(Self::Csv)
        } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            Ok(Self::Spreadsheet)
        } else {
            Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
        }
    }
}

/// Load the dataset from a file path, choosing the reader by extension.
pub fn load_dataset(path: &Path) -> Result<InventoryTable, LoadError> {
    let format = DatasetFormat::from_path(path)?;

    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let table = match format {
        DatasetFormat::Csv => {
            let file = File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            load_dataset_from_reader(file, path)?
        }
        DatasetFormat::Spreadsheet => spreadsheet::load_workbook(path)?,
    };

    info!(
        path = %path.display(),
        rows = table.len(),
        products = table.products().len(),
        "dataset loaded"
    );
    Ok(table)
}

/// Load a CSV dataset from any reader; `origin` is only used in error messages.
pub fn load_dataset_from_reader<R: Read>(
    reader: R,
    origin: &Path,
) -> Result<InventoryTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|error| from_csv_error(origin, error))?
        .clone();

    let header_refs: Vec<&str> = headers.iter().collect();
    let missing = missing_columns(&header_refs);
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: origin.to_path_buf(),
            missing,
        });
    }

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result.map_err(|error| from_csv_error(origin, error))?;
        let line = row.position().map_or(0, csv::Position::line);

        let raw: RawRecord = row
            .deserialize(Some(&headers))
            .map_err(|error| invalid_row(origin, line, error.to_string()))?;
        let record = raw
            .into_record()
            .map_err(|error| invalid_row(origin, line, error.to_string()))?;
        records.push(record);
    }

    Ok(InventoryTable::from_records(records))
}

/// Required columns absent from `headers`, in [`REQUIRED_COLUMNS`] order.
pub(crate) fn missing_columns(headers: &[&str]) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !headers.contains(column))
        .collect()
}

pub(crate) fn invalid_row(path: &Path, line: u64, message: String) -> LoadError {
    LoadError::InvalidRow {
        path: path.to_path_buf(),
        line,
        message,
    }
}

fn from_csv_error(path: &Path, error: csv::Error) -> LoadError {
    let line = error.position().map_or(0, csv::Position::line);
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => invalid_row(path, line, message),
    }
}
