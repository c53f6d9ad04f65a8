//! Column descriptor inference from a label map and the first record.

use indexmap::IndexMap;
use serde_json::Value;

use crate::conf::{
    N_LEN_TEXT_LONG, N_WIDTH_HINT_CURRENCY, N_WIDTH_HINT_DATE, N_WIDTH_HINT_NUMBER,
    N_WIDTH_HINT_TEXT, N_WIDTH_HINT_TEXT_LONG, TUP_KEY_TOKENS_CURRENCY, TUP_KEY_TOKENS_DATE,
};
use crate::spec::{EnumColumnFormat, Record, SpecColumn};

/// Build one column per entry of `column_label_map`, in map order.
///
/// Only the first record is sampled; a null there yields a text column even
/// if later records hold numbers.
pub fn infer_columns(
    data: &[Record],
    column_label_map: &IndexMap<String, String>,
) -> Vec<SpecColumn> {
    let record_sample = data.first();
    column_label_map
        .iter()
        .map(|(key, label)| {
            let value_sample = record_sample
                .and_then(|record| record.get(key))
                .unwrap_or(&Value::Null);
            let (format, n_width) = infer_format(key, value_sample);
            SpecColumn::new(key.clone(), label.clone(), format).with_width(n_width)
        })
        .collect()
}

/// Format and width hint for one key and its sampled value.
pub fn infer_format(key: &str, value_sample: &Value) -> (EnumColumnFormat, f64) {
    let c_key = key.to_lowercase();
    if TUP_KEY_TOKENS_DATE.iter().any(|token| c_key.contains(token)) {
        return (EnumColumnFormat::Date, N_WIDTH_HINT_DATE);
    }
    if TUP_KEY_TOKENS_CURRENCY
        .iter()
        .any(|token| c_key.contains(token))
    {
        return (EnumColumnFormat::Currency, N_WIDTH_HINT_CURRENCY);
    }
    match value_sample {
        Value::Number(_) => (EnumColumnFormat::Number, N_WIDTH_HINT_NUMBER),
        Value::String(s) if s.chars().count() > N_LEN_TEXT_LONG => {
            (EnumColumnFormat::Text, N_WIDTH_HINT_TEXT_LONG)
        }
        _ => (EnumColumnFormat::Text, N_WIDTH_HINT_TEXT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::EnumColumnAlign;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn derive_label_map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(key, label)| (key.to_string(), label.to_string()))
            .collect()
    }

    #[test]
    fn test_infer_columns_priority_and_order() {
        let mut record = Record::new();
        record.insert("createdDate".to_string(), json!(12));
        record.insert("unit_price".to_string(), json!("n/a"));
        record.insert("qty".to_string(), json!(3));
        record.insert("notes".to_string(), json!("x".repeat(31)));
        record.insert("name".to_string(), json!("Silla"));

        let label_map = derive_label_map(&[
            ("name", "Nombre"),
            ("createdDate", "Creado"),
            ("unit_price", "Precio"),
            ("qty", "Cantidad"),
            ("notes", "Notas"),
            ("fecha_baja", "Baja"),
        ]);
        let columns = infer_columns(&[record], &label_map);

        let l_summary: Vec<(&str, EnumColumnFormat, Option<f64>, EnumColumnAlign)> = columns
            .iter()
            .map(|col| (col.key.as_str(), col.format, col.width, col.align))
            .collect();
        assert_eq!(
            l_summary,
            vec![
                ("name", EnumColumnFormat::Text, Some(15.0), EnumColumnAlign::Left),
                ("createdDate", EnumColumnFormat::Date, Some(18.0), EnumColumnAlign::Left),
                ("unit_price", EnumColumnFormat::Currency, Some(20.0), EnumColumnAlign::Right),
                ("qty", EnumColumnFormat::Number, Some(15.0), EnumColumnAlign::Right),
                ("notes", EnumColumnFormat::Text, Some(25.0), EnumColumnAlign::Left),
                ("fecha_baja", EnumColumnFormat::Date, Some(18.0), EnumColumnAlign::Left),
            ]
        );
        assert_eq!(columns[0].label, "Nombre");
    }

    #[test]
    fn test_infer_columns_samples_first_record_only() {
        let mut record_first = Record::new();
        record_first.insert("qty".to_string(), Value::Null);
        let mut record_second = Record::new();
        record_second.insert("qty".to_string(), json!(5));

        let columns = infer_columns(
            &[record_first, record_second],
            &derive_label_map(&[("qty", "Cantidad")]),
        );
        assert_eq!(columns[0].format, EnumColumnFormat::Text);
    }

    #[test]
    fn test_infer_columns_empty_data_defaults_to_text() {
        let columns = infer_columns(&[], &derive_label_map(&[("status", "Estado")]));
        assert_eq!(columns[0].format, EnumColumnFormat::Text);
        assert_eq!(columns[0].width, Some(15.0));
    }
}
