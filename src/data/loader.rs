use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::dimension::{Dimension, DimensionKind};
use super::error::LoadError;
use super::model::{Dataset, FieldValue, Record};

pub const PRICE_COLUMN: &str = "Price";
pub const MILEAGE_COLUMN: &str = "Mileage";
pub const CAR_ID_COLUMN: &str = "Car ID";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the nine required columns (recommended)
/// * `.parquet` – the same columns as typed Arrow arrays
///
/// Required columns: `Brand`, `Model`, `Year`, `Price`, `Mileage`,
/// `Transmission`, `Condition`, `Engine Size`, `Fuel Type`. Extra columns
/// are ignored; `Car ID` is picked up when present.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Column layout shared by both readers
// ---------------------------------------------------------------------------

/// Positions of the required columns within a header.
struct Columns {
    dimensions: [usize; 7],
    price: usize,
    mileage: usize,
    car_id: Option<usize>,
}

impl Columns {
    fn locate<'a>(headers: impl Iterator<Item = &'a str> + Clone) -> Result<Self, LoadError> {
        let position = |name: &str| headers.clone().position(|h| h.trim() == name);

        let mut missing = Vec::new();
        let mut require = |name: &str| {
            let idx = position(name);
            if idx.is_none() {
                missing.push(name.to_string());
            }
            idx.unwrap_or(usize::MAX)
        };

        let dimensions = Dimension::ALL.map(|d| require(d.column_name()));
        let price = require(PRICE_COLUMN);
        let mileage = require(MILEAGE_COLUMN);

        if !missing.is_empty() {
            return Err(LoadError::MissingColumns { columns: missing });
        }

        Ok(Columns {
            dimensions,
            price,
            mileage,
            car_id: position(CAR_ID_COLUMN),
        })
    }
}

/// A cell as read from the file, before column typing is applied.
enum RawCell {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
}

fn to_field(raw: RawCell, dimension: Dimension, row: usize) -> Result<FieldValue, LoadError> {
    let kind = dimension.kind();
    let number = match raw {
        RawCell::Null => return Ok(FieldValue::Missing),
        RawCell::Str(s) if s.trim().is_empty() => return Ok(FieldValue::Missing),
        RawCell::Str(s) if kind == DimensionKind::Text => return Ok(FieldValue::Text(s)),
        RawCell::Int(i) if kind == DimensionKind::Text => return Ok(FieldValue::Text(i.to_string())),
        RawCell::Float(v) if kind == DimensionKind::Text => return Ok(FieldValue::Text(v.to_string())),
        RawCell::Int(i) => Number::Int(i),
        RawCell::Float(v) => Number::Float(v),
        RawCell::Str(s) => {
            let t = s.trim();
            if let Ok(i) = t.parse::<i64>() {
                Number::Int(i)
            } else if let Ok(v) = t.parse::<f64>() {
                Number::Float(v)
            } else {
                return Err(LoadError::InvalidValue {
                    row,
                    column: dimension.column_name().to_string(),
                    value: s,
                });
            }
        }
    };
    Ok(numeric_field(number, kind))
}

enum Number {
    Int(i64),
    Float(f64),
}

/// One representation per column: integral years load as `Integer`, every
/// engine size as `Decimal`. NaN and infinities count as missing.
fn numeric_field(number: Number, kind: DimensionKind) -> FieldValue {
    match (number, kind) {
        (Number::Float(v), _) if !v.is_finite() => FieldValue::Missing,
        (Number::Int(i), DimensionKind::Decimal) => FieldValue::Decimal(i as f64),
        (Number::Int(i), _) => FieldValue::Integer(i),
        (Number::Float(v), DimensionKind::Integer) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
            FieldValue::Integer(v as i64)
        }
        (Number::Float(v), _) => FieldValue::Decimal(v),
    }
}

fn to_number(raw: RawCell, column: &str, row: usize) -> Result<Option<f64>, LoadError> {
    let value = match raw {
        RawCell::Null => None,
        RawCell::Int(i) => Some(i as f64),
        RawCell::Float(v) => Some(v),
        RawCell::Str(s) if s.trim().is_empty() => None,
        RawCell::Str(s) => Some(s.trim().parse::<f64>().map_err(|_| LoadError::InvalidValue {
            row,
            column: column.to_string(),
            value: s,
        })?),
    };
    Ok(value.filter(|v| !v.is_nan()))
}

fn build_record(
    columns: &Columns,
    row: usize,
    mut cell: impl FnMut(usize) -> Result<RawCell, LoadError>,
) -> Result<Record, LoadError> {
    let [brand, model, year, transmission, condition, engine_size, fuel_type] = columns.dimensions;

    let car_id = match columns.car_id {
        Some(idx) => match cell(idx)? {
            RawCell::Int(i) => Some(i),
            RawCell::Str(s) => s.trim().parse().ok(),
            _ => None,
        },
        None => None,
    };

    Ok(Record {
        car_id,
        brand: to_field(cell(brand)?, Dimension::Brand, row)?,
        model: to_field(cell(model)?, Dimension::Model, row)?,
        year: to_field(cell(year)?, Dimension::Year, row)?,
        transmission: to_field(cell(transmission)?, Dimension::Transmission, row)?,
        condition: to_field(cell(condition)?, Dimension::Condition, row)?,
        engine_size: to_field(cell(engine_size)?, Dimension::EngineSize, row)?,
        fuel_type: to_field(cell(fuel_type)?, Dimension::FuelType, row)?,
        price: to_number(cell(columns.price)?, PRICE_COLUMN, row)?,
        mileage: to_number(cell(columns.mileage)?, MILEAGE_COLUMN, row)?,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one listing per line.
/// Empty cells are treated as missing values.
fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let columns = Columns::locate(headers.iter().map(String::as_str))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let record = build_record(&columns, row_no, |idx| {
            Ok(match row.get(idx) {
                Some(s) => RawCell::Str(s.to_string()),
                None => RawCell::Null,
            })
        })?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the listing columns.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns Int32, Int64,
/// Float32 or Float64. Nulls become missing values.
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let columns = Columns::locate(schema.fields().iter().map(|f| f.name().as_str()))?;
        let offset = records.len();

        for row in 0..batch.num_rows() {
            let record = build_record(&columns, offset + row, |idx| {
                let name = schema.field(idx).name();
                raw_arrow_cell(batch.column(idx), row, name)
            })?;
            records.push(record);
        }
    }

    Ok(Dataset::from_records(records))
}

/// Extract a single cell from an Arrow column at a given row.
fn raw_arrow_cell(col: &ArrayRef, row: usize, name: &str) -> Result<RawCell, LoadError> {
    if col.is_null(row) {
        return Ok(RawCell::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|a| RawCell::Str(a.value(row).to_string())),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|a| RawCell::Str(a.value(row).to_string())),
        DataType::Int32 => col.as_primitive_opt::<Int32Type>().map(|a| RawCell::Int(a.value(row) as i64)),
        DataType::Int64 => col.as_primitive_opt::<Int64Type>().map(|a| RawCell::Int(a.value(row))),
        DataType::Float32 => col.as_primitive_opt::<Float32Type>().map(|a| RawCell::Float(a.value(row) as f64)),
        DataType::Float64 => col.as_primitive_opt::<Float64Type>().map(|a| RawCell::Float(a.value(row))),
        _ => None,
    };
    cell.ok_or_else(|| LoadError::UnsupportedColumnType {
        column: name.to_string(),
        data_type: format!("{:?}", col.data_type()),
    })
}
