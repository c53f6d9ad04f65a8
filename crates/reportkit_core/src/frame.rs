//! Polars adapter: DataFrame (or its IPC payload) into report records.

use std::io::Cursor;

use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};
use serde_json::{Number, Value};

use crate::error::{ReportError, ReportResult};
use crate::spec::Record;

/// One record per row, keys in frame column order.
pub fn derive_records_from_dataframe(df: &DataFrame) -> ReportResult<Vec<Record>> {
    let l_cols = df.get_columns();
    let mut l_records = Vec::with_capacity(df.height());
    for n_idx_row in 0..df.height() {
        let mut record = Record::with_capacity(l_cols.len());
        for col in l_cols {
            let value = col.get(n_idx_row).map_err(|err| {
                ReportError::Frame(format!(
                    "Failed to read row {n_idx_row} of column `{}`: {err}",
                    col.name()
                ))
            })?;
            record.insert(col.name().to_string(), derive_json_from_any_value(value));
        }
        l_records.push(record);
    }
    Ok(l_records)
}

/// Decode an Arrow IPC file payload and convert it like
/// [`derive_records_from_dataframe`].
pub fn derive_records_from_ipc_bytes(v_ipc_df: &[u8]) -> ReportResult<Vec<Record>> {
    let df = IpcReader::new(Cursor::new(v_ipc_df))
        .finish()
        .map_err(|err| ReportError::Frame(format!("Failed to read IPC DataFrame bytes: {err}")))?;
    derive_records_from_dataframe(&df)
}

fn derive_json_from_any_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(val) => Value::Bool(val),
        AnyValue::String(val) => Value::String(val.to_string()),
        AnyValue::StringOwned(val) => Value::String(val.to_string()),
        AnyValue::UInt8(val) => Value::from(val),
        AnyValue::UInt16(val) => Value::from(val),
        AnyValue::UInt32(val) => Value::from(val),
        AnyValue::UInt64(val) => Value::from(val),
        AnyValue::Int8(val) => Value::from(val),
        AnyValue::Int16(val) => Value::from(val),
        AnyValue::Int32(val) => Value::from(val),
        AnyValue::Int64(val) => Value::from(val),
        AnyValue::Float32(val) => derive_json_from_f64(f64::from(val)),
        AnyValue::Float64(val) => derive_json_from_f64(val),
        _ => Value::String(value.to_string()),
    }
}

fn derive_json_from_f64(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, IpcWriter, SerWriter};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn derive_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("name".into(), [Some("Silla"), None]),
            Column::new("qty".into(), [Some(3i64), Some(-2)]),
            Column::new("price".into(), [Some(12.5f64), Some(f64::NAN)]),
            Column::new("active".into(), [true, false]),
        ])
        .unwrap()
    }

    #[test]
    fn test_records_from_dataframe_keep_order_and_types() {
        let l_records = derive_records_from_dataframe(&derive_frame()).unwrap();
        assert_eq!(l_records.len(), 2);
        assert_eq!(
            l_records[0].keys().cloned().collect::<Vec<_>>(),
            vec!["name", "qty", "price", "active"]
        );
        assert_eq!(l_records[0]["name"], json!("Silla"));
        assert_eq!(l_records[0]["qty"], json!(3));
        assert_eq!(l_records[0]["price"], json!(12.5));
        assert_eq!(l_records[0]["active"], json!(true));
        assert_eq!(l_records[1]["name"], Value::Null);
        assert_eq!(l_records[1]["qty"], json!(-2));
        assert_eq!(l_records[1]["price"], Value::Null);
    }

    #[test]
    fn test_records_from_ipc_bytes() {
        let mut df = derive_frame();
        let mut v_ipc: Vec<u8> = Vec::new();
        IpcWriter::new(&mut v_ipc).finish(&mut df).unwrap();

        let l_records = derive_records_from_ipc_bytes(&v_ipc).unwrap();
        assert_eq!(l_records, derive_records_from_dataframe(&df).unwrap());
    }

    #[test]
    fn test_records_from_invalid_ipc_bytes_fail() {
        let err = derive_records_from_ipc_bytes(b"not arrow").unwrap_err();
        assert!(matches!(err, ReportError::Frame(_)));
    }
}
