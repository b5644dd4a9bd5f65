use std::io;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, UInt64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use flate2::read::MultiGzDecoder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use tempfile::NamedTempFile;

use super::error::LoadError;
use super::fetch::{fetch_bytes, FetchOptions};
use super::model::{Column, Dataset, Value};
use super::normalize::normalize_names;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fetch, decompress, parse and normalize the artifact at `location`.
pub fn load_dataset(location: &str, options: &FetchOptions) -> Result<Dataset, LoadError> {
    let bytes = fetch_bytes(location, options)?;
    let dataset = load_from_bytes(&bytes)?;
    log::info!(
        "Loaded {location}: {} rows × {} columns",
        dataset.len(),
        dataset.columns().len()
    );
    Ok(dataset)
}

/// Everything after retrieval: `bytes` is the gzip-wrapped Parquet file.
pub fn load_from_bytes(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let temp = decompress_to_temp(bytes)?;
    let file = temp.reopen().map_err(|e| LoadError::Decompression {
        reason: format!("could not reopen decompressed payload: {e}"),
    })?;
    let mut dataset = parse_parquet(file)?;
    // `temp` is removed from disk when it goes out of scope, on every path.
    drop(temp);

    let raw: Vec<String> = dataset.columns().iter().map(|c| c.name.clone()).collect();
    dataset.rename_columns(normalize_names(&raw));
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Decompression
// ---------------------------------------------------------------------------

/// Inflate the gzip envelope into a temporary file that deletes itself on drop.
///
/// Concatenated members are decoded in order; bytes after the last member
/// that do not start another member are an error.
pub fn decompress_to_temp(bytes: &[u8]) -> Result<NamedTempFile, LoadError> {
    if bytes.len() < GZIP_MAGIC.len() || bytes[..2] != GZIP_MAGIC {
        return Err(LoadError::Decompression {
            reason: "missing gzip header".to_string(),
        });
    }

    let mut temp = tempfile::Builder::new()
        .prefix("cartelera-")
        .suffix(".parquet")
        .tempfile()
        .map_err(|e| LoadError::Decompression {
            reason: format!("could not create temporary file: {e}"),
        })?;

    let mut decoder = MultiGzDecoder::new(bytes);
    let written = io::copy(&mut decoder, temp.as_file_mut()).map_err(|e| {
        LoadError::Decompression {
            reason: e.to_string(),
        }
    })?;
    log::debug!(
        "Inflated {} -> {written} bytes into {}",
        bytes.len(),
        temp.path().display()
    );
    Ok(temp)
}

// ---------------------------------------------------------------------------
// Parquet parsing
// ---------------------------------------------------------------------------

/// Read every record batch of a Parquet file into a [`Dataset`].
/// Column names are returned exactly as stored in the file.
pub fn parse_parquet<R: ChunkReader + 'static>(reader: R) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader).map_err(LoadError::parse)?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(LoadError::parse)?;

    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for batch_result in reader {
        let batch = batch_result.map_err(LoadError::parse)?;
        if batch.num_columns() != names.len() {
            return Err(LoadError::parse(format!(
                "record batch has {} columns, schema has {}",
                batch.num_columns(),
                names.len()
            )));
        }
        for (idx, col) in batch.columns().iter().enumerate() {
            values[idx].extend(column_values(&names[idx], col)?);
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, vals)| Column::new(name, vals))
        .collect();
    Dataset::new(columns)
}

// -- Arrow helpers --

/// Convert one Arrow column into cells.
fn column_values(name: &str, col: &ArrayRef) -> Result<Vec<Value>, LoadError> {
    let widen = |to: &DataType| cast(col.as_ref(), to).map_err(|e| LoadError::parse_in(name, e));

    let values = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let arr = widen(&DataType::Utf8)?;
            arr.as_string::<i32>()
                .iter()
                .map(|v| v.map_or(Value::Null, |s| Value::String(s.to_string())))
                .collect()
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let arr = widen(&DataType::Int64)?;
            arr.as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map_or(Value::Null, Value::Integer))
                .collect()
        }
        DataType::UInt64 => col
            .as_primitive::<UInt64Type>()
            .iter()
            .map(|v| match v {
                None => Value::Null,
                Some(u) => i64::try_from(u)
                    .map(Value::Integer)
                    .unwrap_or(Value::Float(u as f64)),
            })
            .collect(),
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let arr = widen(&DataType::Float64)?;
            arr.as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.map_or(Value::Null, Value::Float))
                .collect()
        }
        DataType::Boolean => col
            .as_boolean()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect(),
        DataType::Null => vec![Value::Null; col.len()],
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            formatted(name, col, Value::Date)?
        }
        // Lists, structs, decimals, ...: keep Arrow's own text rendering.
        _ => formatted(name, col, Value::String)?,
    };
    Ok(values)
}

fn formatted(
    name: &str,
    col: &ArrayRef,
    wrap: fn(String) -> Value,
) -> Result<Vec<Value>, LoadError> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(col.as_ref(), &options)
        .map_err(|e| LoadError::parse_in(name, e))?;
    Ok((0..col.len())
        .map(|i| {
            if col.is_null(i) {
                Value::Null
            } else {
                wrap(formatter.value(i).to_string())
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{
        BooleanArray, Date32Array, Float32Array, Int32Array, LargeStringArray, StringArray,
    };
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::LoadErrorKind;

    fn parquet_bytes(batch: &RecordBatch) -> Vec<u8> {
        let mut writer = ArrowWriter::try_new(Vec::new(), batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.into_inner().unwrap()
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(bytes).unwrap();
        enc.finish().unwrap()
    }

    fn events_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Evento ", DataType::Utf8, true),
            Field::new("evento", DataType::LargeUtf8, true),
            Field::new("Recinto!", DataType::Int32, true),
            Field::new("Precio", DataType::Float32, true),
            Field::new("Gratuito", DataType::Boolean, true),
            Field::new("Fecha", DataType::Date32, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![Some("Danza"), None])),
                Arc::new(LargeStringArray::from(vec!["a", "b"])),
                Arc::new(Int32Array::from(vec![Some(7), None])),
                Arc::new(Float32Array::from(vec![Some(1.5), Some(0.0)])),
                Arc::new(BooleanArray::from(vec![Some(true), Some(false)])),
                // 2025-10-02 is day 20363 since the epoch.
                Arc::new(Date32Array::from(vec![Some(20363), None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn gzip_parquet_round_trips_into_normalized_dataset() {
        let bytes = gzip(&parquet_bytes(&events_batch()));
        let ds = load_from_bytes(&bytes).unwrap();

        assert_eq!(
            ds.column_names(),
            vec!["evento", "evento_2", "recinto", "precio", "gratuito", "fecha"]
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.row(0).unwrap(),
            vec![
                &Value::String("Danza".into()),
                &Value::String("a".into()),
                &Value::Integer(7),
                &Value::Float(1.5),
                &Value::Bool(true),
                &Value::Date("2025-10-02".into()),
            ]
        );
        assert_eq!(ds.cell(1, 0), Some(&Value::Null));
        assert_eq!(ds.cell(1, 2), Some(&Value::Null));
        assert_eq!(ds.cell(1, 5), Some(&Value::Null));
    }

    #[test]
    fn plain_bytes_are_a_decompression_error() {
        let err = load_from_bytes(b"PAR1 not gzip").unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Decompression);
        let err = load_from_bytes(&[]).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Decompression);
    }

    #[test]
    fn truncated_gzip_is_a_decompression_error() {
        let full = gzip(&parquet_bytes(&events_batch()));
        let err = load_from_bytes(&full[..full.len() / 2]).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Decompression, "{err}");
    }

    #[test]
    fn concatenated_members_load_as_one_payload() {
        let parquet = parquet_bytes(&events_batch());
        let (head, tail) = parquet.split_at(parquet.len() / 2);
        let mut bytes = gzip(head);
        bytes.extend(gzip(tail));

        let ds = load_from_bytes(&bytes).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.cell(0, 0), Some(&Value::String("Danza".into())));
    }

    #[test]
    fn trailing_junk_is_a_decompression_error() {
        let mut bytes = gzip(&parquet_bytes(&events_batch()));
        bytes.extend_from_slice(b"GARBAGE GARBAGE");
        let err = load_from_bytes(&bytes).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Decompression, "{err}");
    }

    #[test]
    fn gzip_of_text_is_a_parse_error() {
        let err = load_from_bytes(&gzip(b"evento,recinto\nDanza,Foro\n")).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Parse, "{err}");
    }

    #[test]
    fn temp_file_is_removed_after_drop() {
        let temp = decompress_to_temp(&gzip(b"payload")).unwrap();
        let path = temp.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
        drop(temp);
        assert!(!path.exists());
    }

    #[test]
    fn zero_row_file_gives_empty_dataset() {
        let schema = Arc::new(Schema::new(vec![Field::new("Evento", DataType::Utf8, true)]));
        let batch = RecordBatch::new_empty(schema);
        let ds = load_from_bytes(&gzip(&parquet_bytes(&batch))).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.column_names(), vec!["evento"]);
    }
}
