use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{CellValue, DataStore, Table, SCHEMAS};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every study dataset from `dir` and build the validated store.
///
/// Each dataset name resolves to `<name>.csv`, `<name>.parquet` or
/// `<name>.json`, in that order (CSV is the canonical upstream format). Any
/// column literally named `date` is coerced to calendar dates here, once.
pub fn load_dir(dir: &Path) -> Result<DataStore> {
    let mut tables = BTreeMap::new();
    for schema in SCHEMAS {
        let mut table = load_dataset(dir, schema.name)
            .with_context(|| format!("loading dataset '{}'", schema.name))?;
        table.coerce_date_column(schema.name, "date")?;
        tables.insert(schema.name.to_string(), table);
    }
    let store = DataStore::new(tables)?;
    log::info!(
        "loaded {} datasets ({} rows) from {}, geographies: {:?}",
        store.dataset_count(),
        store.total_rows(),
        dir.display(),
        store.geographies()
    );
    Ok(store)
}

/// Resolve one dataset name to a file in `dir` and load it.
pub fn load_dataset(dir: &Path, name: &str) -> Result<Table> {
    for ext in ["csv", "parquet", "json"] {
        let path = dir.join(format!("{name}.{ext}"));
        if path.is_file() {
            return load_file(&path);
        }
    }
    Err(DataError::MissingDataset {
        name: name.to_string(),
        dir: dir.to_path_buf(),
    }
    .into())
}

/// Load a single table file. Dispatch by extension.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per table row. Cell
/// types are inferred per field; dates stay strings until the store-level
/// coercion pass.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record.iter().map(guess_cell).collect());
    }

    Ok(Table::from_rows(headers, records))
}

fn guess_cell(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "geography": "Italy", "date": "2020-02-15", "percent_red": -0.02 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: BTreeSet<String> = BTreeSet::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        columns.extend(obj.keys().cloned());
    }
    let columns: Vec<String> = columns.into_iter().collect();

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        // Validated as objects above.
        let obj = row.as_object().context("non-object row")?;
        records.push(
            columns
                .iter()
                .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
                .collect(),
        );
    }

    Ok(Table::from_rows(columns, records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load one study table from Parquet. All columns are scalars (strings, ints,
/// floats, bools, date32); works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<String> = Vec::new();
    let mut cells: Vec<Vec<CellValue>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if columns.is_empty() {
            columns = schema.fields().iter().map(|f| f.name().clone()).collect();
            cells = columns.iter().map(|_| Vec::new()).collect();
        }

        for (c, field) in schema.fields().iter().enumerate() {
            let array = batch.column(c);
            let out = cells.get_mut(c).with_context(|| {
                format!("schema changed between batches at column '{}'", field.name())
            })?;
            for row in 0..batch.num_rows() {
                out.push(extract_cell(array, row)?);
            }
        }
    }

    Ok(Table::from_columns(columns, cells)?)
}

/// Extract a single scalar value from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            CellValue::Bool(arr.value(row))
        }
        DataType::Date32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Date32Array>()
                .context("expected Date32Array")?;
            // Date32 counts days since the Unix epoch.
            let days = arr.value(row);
            match NaiveDate::from_num_days_from_ce_opt(719_163 + days) {
                Some(d) => CellValue::Date(d),
                None => bail!("date32 value {days} out of range"),
            }
        }
        other => CellValue::String(format!("{other:?}")),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn csv_cells_get_typed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "geography,coefficient,N,flag,empty").unwrap();
        writeln!(f, "Italy,-0.25,42,true,").unwrap();
        drop(f);

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.cell(0, "geography"),
            Some(&CellValue::String("Italy".into()))
        );
        assert_eq!(table.cell(0, "coefficient"), Some(&CellValue::Float(-0.25)));
        assert_eq!(table.cell(0, "N"), Some(&CellValue::Integer(42)));
        assert_eq!(table.cell(0, "flag"), Some(&CellValue::Bool(true)));
        assert_eq!(table.cell(0, "empty"), Some(&CellValue::Null));
    }

    #[test]
    fn json_records_become_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        std::fs::write(
            &path,
            r#"[{"geography":"Italy","SIP":2},{"geography":"Spain","SIP":1,"extra":null}]"#,
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "SIP"), Some(&CellValue::Integer(2)));
        // Key missing from the first record is padded with Null.
        assert_eq!(table.cell(0, "extra"), Some(&CellValue::Null));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("figure1.xlsx")).unwrap_err();
        assert!(err.downcast_ref::<DataError>().is_some());
    }

    #[test]
    fn missing_dataset_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path(), "figure1").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingDataset { .. })
        ));
    }

    #[test]
    fn load_dir_builds_a_store_and_coerces_dates() {
        let dir = tempfile::tempdir().unwrap();
        crate::data::testdata::write_sample_csvs(dir.path());

        let store = load_dir(dir.path()).unwrap();
        assert_eq!(store.dataset_count(), SCHEMAS.len());
        let fig1 = store.table("figure1").unwrap();
        assert!(fig1.cell(0, "date").and_then(CellValue::as_date).is_some());
    }
}
