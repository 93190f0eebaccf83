use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{parse_coordinate, parse_count, CrossingDataset, CrossingRecord};

/// Column names shared by every supported format.
pub const BORDER: &str = "Border";
pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const LONGITUDE: &str = "Longitude";
pub const LATITUDE: &str = "Latitude";
pub const VALUE: &str = "Value";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a crossing dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "Border": ..., "Year": ..., "Value": ... }, ...]`
/// * `.csv`     – header row naming the same columns
/// * `.parquet` – one column per field, text or numeric
pub fn load_file(path: &Path) -> Result<CrossingDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if dataset.malformed > 0 {
        log::warn!(
            "{} of {} records have non-numeric Value/Longitude/Latitude",
            dataset.malformed,
            dataset.len()
        );
    }
    Ok(dataset)
}

/// Assemble a record from already-extracted text cells.
fn record_from_cells(
    border: String,
    year: String,
    month: String,
    longitude: &str,
    latitude: &str,
    value: &str,
) -> CrossingRecord {
    CrossingRecord {
        border,
        year,
        month,
        longitude: parse_coordinate(longitude),
        latitude: parse_coordinate(latitude),
        value: parse_count(value),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Border": "US-Mexico Border",
///     "Year": "2020",
///     "Month": "March",
///     "Longitude": -117.03,
///     "Latitude": 32.54,
///     "Value": "1200"
///   },
///   ...
/// ]
/// ```
///
/// Cells may be strings or numbers. Missing keys read as empty cells.
fn load_json(path: &Path) -> Result<CrossingDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<CrossingDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let cell = |key: &str| obj.get(key).map(json_cell_text).unwrap_or_default();

        records.push(record_from_cells(
            cell(BORDER),
            cell(YEAR),
            cell(MONTH),
            &cell(LONGITUDE),
            &cell(LATITUDE),
            &cell(VALUE),
        ));
    }

    Ok(CrossingDataset::from_records(records))
}

fn json_cell_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. `Border`, `Year` and `Value`
/// are required; the other columns default to empty cells.
fn load_csv(path: &Path) -> Result<CrossingDataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<CrossingDataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let border_idx = column(BORDER).context("CSV missing 'Border' column")?;
    let year_idx = column(YEAR).context("CSV missing 'Year' column")?;
    let value_idx = column(VALUE).context("CSV missing 'Value' column")?;
    let month_idx = column(MONTH);
    let lon_idx = column(LONGITUDE);
    let lat_idx = column(LATITUDE);

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let get = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");

        records.push(record_from_cells(
            get(Some(border_idx)).to_string(),
            get(Some(year_idx)).to_string(),
            get(month_idx).to_string(),
            get(lon_idx),
            get(lat_idx),
            get(Some(value_idx)),
        ));
    }

    Ok(CrossingDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of crossing records.
///
/// Each field is one column; text columns may be Utf8 or LargeUtf8 and
/// numeric columns Int32/Int64/Float32/Float64. `Border`, `Year` and
/// `Value` are required.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<CrossingDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let required = |name: &str| {
            schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };
        let border_col = batch.column(required(BORDER)?);
        let year_col = batch.column(required(YEAR)?);
        let value_col = batch.column(required(VALUE)?);
        let month_col = schema.index_of(MONTH).ok().map(|i| batch.column(i));
        let lon_col = schema.index_of(LONGITUDE).ok().map(|i| batch.column(i));
        let lat_col = schema.index_of(LATITUDE).ok().map(|i| batch.column(i));

        for row in 0..batch.num_rows() {
            let optional = |col: Option<&Arc<dyn Array>>| {
                col.map(|c| cell_text(c, row)).unwrap_or_default()
            };
            records.push(record_from_cells(
                cell_text(border_col, row),
                cell_text(year_col, row),
                optional(month_col),
                &optional(lon_col),
                &optional(lat_col),
                &cell_text(value_col, row),
            ));
        }
    }

    Ok(CrossingDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

/// Render one Arrow cell as text; nulls and unsupported types become empty.
fn cell_text(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        other => {
            log::debug!("ignoring parquet cell of type {other:?}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::ArrayRef;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    #[test]
    fn test_json_string_and_number_cells() {
        let text = r#"[
            {"Border": "US-Mexico Border", "Year": "2020", "Month": "May",
             "Longitude": -117.03, "Latitude": "32.54", "Value": "100"},
            {"Border": "US-Canada Border", "Year": 2021, "Month": "June",
             "Longitude": "-78.9", "Latitude": 42.9, "Value": 50}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].value, Some(100));
        assert_eq!(ds.records[0].longitude, -117.03);
        assert_eq!(ds.records[0].latitude, 32.54);
        assert_eq!(ds.records[1].year, "2021");
        assert_eq!(ds.records[1].value, Some(50));
        assert_eq!(ds.years, vec!["2020", "2021"]);
        assert_eq!(ds.malformed, 0);
    }

    #[test]
    fn test_json_missing_and_malformed_cells() {
        let text = r#"[
            {"Border": "US-Mexico Border", "Year": "2020", "Value": "n/a"},
            {"Border": "US-Mexico Border", "Year": "2020", "Month": null, "Value": "7"}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.records[0].month, "");
        assert_eq!(ds.records[0].value, None);
        assert!(ds.records[0].longitude.is_nan());
        assert_eq!(ds.records[1].month, "");
        assert_eq!(ds.records[1].value, Some(7));
        assert_eq!(ds.malformed, 2);
    }

    #[test]
    fn test_json_rejects_non_array() {
        assert!(parse_json(r#"{"Border": "US-Mexico Border"}"#).is_err());
        assert!(parse_json(r#"[1, 2]"#).is_err());
        assert!(parse_json("not json").is_err());
    }

    #[test]
    fn test_csv_reader() {
        let data = "Border,Year,Month,Longitude,Latitude,Value\n\
                    US-Mexico Border,2020,March,-106.45,31.76,12\n\
                    US-Canada Border,2019,April,-83.04,42.33,8\n";
        let ds = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].month, "March");
        assert_eq!(ds.records[1].latitude, 42.33);
        assert_eq!(ds.years, vec!["2019", "2020"]);
    }

    #[test]
    fn test_csv_optional_columns() {
        let data = "Value,Year,Border\n3,2020,US-Mexico Border\n";
        let ds = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(ds.records[0].value, Some(3));
        assert_eq!(ds.records[0].month, "");
        assert!(ds.records[0].latitude.is_nan());
    }

    #[test]
    fn test_csv_missing_required_column() {
        let data = "Border,Month\nUS-Mexico Border,May\n";
        assert!(read_csv(csv::Reader::from_reader(data.as_bytes())).is_err());
    }

    #[test]
    fn test_load_file_dispatch() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("data.json");
        let mut f = std::fs::File::create(&json_path).unwrap();
        write!(f, r#"[{{"Border": "US-Canada Border", "Year": "2001", "Value": 4}}]"#).unwrap();
        let ds = load_file(&json_path).unwrap();
        assert_eq!(ds.records[0].value, Some(4));

        let txt_path = dir.path().join("data.txt");
        std::fs::write(&txt_path, "").unwrap();
        assert!(load_file(&txt_path).is_err());

        assert!(load_file(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_parquet_round_trip_mixed_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(BORDER, DataType::Utf8, false),
            Field::new(YEAR, DataType::Utf8, false),
            Field::new(MONTH, DataType::Utf8, true),
            Field::new(LONGITUDE, DataType::Float64, true),
            Field::new(LATITUDE, DataType::Float64, true),
            Field::new(VALUE, DataType::Int64, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["US-Mexico Border", "US-Canada Border"])),
            Arc::new(StringArray::from(vec!["2020", "2021"])),
            Arc::new(StringArray::from(vec![Some("May"), None])),
            Arc::new(Float64Array::from(vec![Some(-117.03), None])),
            Arc::new(Float64Array::from(vec![Some(32.54), Some(49.0)])),
            Arc::new(Int64Array::from(vec![Some(100), None])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].value, Some(100));
        assert_eq!(ds.records[0].month, "May");
        assert_eq!(ds.records[0].longitude, -117.03);
        assert_eq!(ds.records[1].month, "");
        assert!(ds.records[1].longitude.is_nan());
        assert_eq!(ds.records[1].value, None);
        assert_eq!(ds.malformed, 1);
    }
}
