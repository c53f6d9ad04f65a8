//! Value formatter: raw record values to display text and typed sheet values.
//!
//! Every function here is total. Malformed input degrades to the raw text or
//! to `0`, never to an error, and never to a literal `"null"`.

use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::conf::{
    C_CURRENCY_SYMBOL, C_DATE_DISPLAY_PATTERN, C_DECIMAL_SEPARATOR, C_THOUSANDS_SEPARATOR,
    C_TIMESTAMP_LONG_PATTERN, N_CURRENCY_FRACTION_DIGITS, N_NUMBER_FRACTION_DIGITS_MAX,
    N_PERCENTAGE_FRACTION_DIGITS,
};
use crate::spec::{EnumCellValue, EnumColumnFormat};

const TUP_NAIVE_DATETIME_PATTERNS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M", "%d/%m/%Y %H:%M:%S"];
const TUP_NAIVE_DATE_PATTERNS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
/// Whole floats below this print as integers; `f64` display switches to
/// exponent notation from here on.
const N_WHOLE_FLOAT_TEXT_MAX: f64 = 1e21;

////////////////////////////////////////////////////////////////////////////////
// #region Display

/// Render `value` as display text according to `format`.
pub fn format_value(value: &Value, format: EnumColumnFormat) -> String {
    match format {
        EnumColumnFormat::Text => format_text(value),
        EnumColumnFormat::Number => {
            format_grouped(coerce_number(value), N_NUMBER_FRACTION_DIGITS_MAX, true)
        }
        EnumColumnFormat::Currency => format!(
            "{C_CURRENCY_SYMBOL}{}",
            format_grouped(coerce_number(value), N_CURRENCY_FRACTION_DIGITS, false)
        ),
        EnumColumnFormat::Percentage => format!(
            "{}%",
            format_fixed(coerce_number(value) * 100.0, N_PERCENTAGE_FRACTION_DIGITS)
        ),
        EnumColumnFormat::Date => match parse_date(value) {
            Some(date) => date.format(C_DATE_DISPLAY_PATTERN).to_string(),
            None => format_text(value),
        },
    }
}

/// Native spreadsheet value for `value` under `format`.
pub fn derive_typed_value(value: &Value, format: EnumColumnFormat) -> EnumCellValue {
    match format {
        EnumColumnFormat::Text => match value {
            Value::Null => EnumCellValue::None,
            _ => EnumCellValue::String(format_text(value)),
        },
        EnumColumnFormat::Number | EnumColumnFormat::Currency | EnumColumnFormat::Percentage => {
            EnumCellValue::Number(coerce_number(value))
        }
        EnumColumnFormat::Date => match (parse_date(value), value) {
            (Some(date), _) => EnumCellValue::Date(date),
            (None, Value::Null) => EnumCellValue::None,
            (None, _) => EnumCellValue::String(format_text(value)),
        },
    }
}

/// Plain text rendering; null is the empty string.
pub fn format_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(val) => val.clone(),
        Value::Bool(val) => val.to_string(),
        Value::Number(val) => match val.as_f64() {
            Some(n)
                if val.is_f64() && n.fract() == 0.0 && n.abs() < N_WHOLE_FLOAT_TEXT_MAX =>
            {
                // `+ 0.0` turns a negative zero into `0`.
                format!("{:.0}", n + 0.0)
            }
            _ => val.to_string(),
        },
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Long-form timestamp for metadata lines, e.g. `5 de marzo de 2024, 14:30 UTC`.
pub fn format_long_timestamp(dt: DateTime<Utc>) -> String {
    dt.format_localized(C_TIMESTAMP_LONG_PATTERN, Locale::es_ES)
        .to_string()
        .trim()
        .to_string()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Coercion

/// Coerce to a finite `f64`; anything unparsable is `0`.
pub fn coerce_number(value: &Value) -> f64 {
    let n_value = match value {
        Value::Null => 0.0,
        Value::Bool(val) => {
            if *val {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(val) => val.as_f64().unwrap_or(0.0),
        Value::String(val) => {
            let c_trimmed = val.trim();
            if c_trimmed.is_empty() {
                0.0
            } else {
                c_trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Array(_) | Value::Object(_) => 0.0,
    };
    if n_value.is_finite() { n_value } else { 0.0 }
}

/// Parse a date-like value. Timestamps with offsets are read in UTC; JSON
/// numbers are epoch milliseconds.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(val) => parse_date_str(val.trim()),
        Value::Number(val) => {
            let n_millis = val.as_i64().or_else(|| val.as_f64().map(|n| n as i64))?;
            DateTime::from_timestamp_millis(n_millis).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

fn parse_date_str(c_value: &str) -> Option<NaiveDate> {
    if c_value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(c_value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = c_value.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    for c_pattern in TUP_NAIVE_DATETIME_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(c_value, c_pattern) {
            return Some(dt.date());
        }
    }
    for c_pattern in TUP_NAIVE_DATE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(c_value, c_pattern) {
            return Some(date);
        }
    }
    None
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region NumberText

/// Fixed-point text without grouping; a rendered zero never carries a sign.
pub fn format_fixed(x: f64, n_decimals: usize) -> String {
    let c_fixed = format!("{:.*}", n_decimals, x);
    match c_fixed.strip_prefix('-') {
        Some(c_abs) if !has_nonzero_digit(c_abs) => c_abs.to_string(),
        _ => c_fixed,
    }
}

/// Locale-grouped text with `n_decimals` fraction digits, optionally trimming
/// trailing zeros (and the separator when nothing remains).
pub fn format_grouped(x: f64, n_decimals: usize, if_trim_zeros: bool) -> String {
    let c_abs = format!("{:.*}", n_decimals, x.abs());
    let (c_int, c_frac) = c_abs.split_once('.').unwrap_or((c_abs.as_str(), ""));
    let c_frac = if if_trim_zeros {
        c_frac.trim_end_matches('0')
    } else {
        c_frac
    };

    let mut c_out = String::with_capacity(c_abs.len() + c_int.len() / 3 + 1);
    if x < 0.0 && (has_nonzero_digit(c_int) || has_nonzero_digit(c_frac)) {
        c_out.push('-');
    }
    c_out.push_str(&group_thousands(c_int));
    if !c_frac.is_empty() {
        c_out.push(C_DECIMAL_SEPARATOR);
        c_out.push_str(c_frac);
    }
    c_out
}

fn group_thousands(c_digits: &str) -> String {
    let n_len = c_digits.len();
    let mut c_out = String::with_capacity(n_len + n_len / 3);
    for (n_idx, chr) in c_digits.chars().enumerate() {
        if n_idx > 0 && (n_len - n_idx) % 3 == 0 {
            c_out.push(C_THOUSANDS_SEPARATOR);
        }
        c_out.push(chr);
    }
    c_out
}

fn has_nonzero_digit(c_digits: &str) -> bool {
    c_digits.chars().any(|chr| chr.is_ascii_digit() && chr != '0')
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_date_rfc3339_renders_day_first() {
        assert_eq!(
            format_value(&json!("2024-03-05T00:00:00Z"), EnumColumnFormat::Date),
            "05/03/2024"
        );
        assert_eq!(format_value(&json!("2024-12-31"), EnumColumnFormat::Date), "31/12/2024");
        assert_eq!(format_value(&json!("2024/03/05"), EnumColumnFormat::Date), "05/03/2024");
        assert_eq!(
            format_value(&json!("2024-01-02 08:15:00"), EnumColumnFormat::Date),
            "02/01/2024"
        );
    }

    #[test]
    fn test_date_offset_is_read_in_utc() {
        assert_eq!(
            format_value(&json!("2024-03-05T22:00:00-05:00"), EnumColumnFormat::Date),
            "06/03/2024"
        );
    }

    #[test]
    fn test_date_epoch_millis() {
        assert_eq!(
            format_value(&json!(1_709_596_800_000i64), EnumColumnFormat::Date),
            "05/03/2024"
        );
    }

    #[test]
    fn test_date_unparsable_passes_through() {
        assert_eq!(format_value(&json!("pendiente"), EnumColumnFormat::Date), "pendiente");
        assert_eq!(format_value(&Value::Null, EnumColumnFormat::Date), "");
        assert_eq!(
            derive_typed_value(&json!("pendiente"), EnumColumnFormat::Date),
            EnumCellValue::String("pendiente".to_string())
        );
        assert_eq!(derive_typed_value(&Value::Null, EnumColumnFormat::Date), EnumCellValue::None);
    }

    #[test]
    fn test_currency_groups_and_pads() {
        assert_eq!(format_value(&json!(1234.5), EnumColumnFormat::Currency), "$1,234.50");
        assert_eq!(format_value(&json!("1000000"), EnumColumnFormat::Currency), "$1,000,000.00");
        assert_eq!(format_value(&json!(-3), EnumColumnFormat::Currency), "$-3.00");
        assert_eq!(format_value(&Value::Null, EnumColumnFormat::Currency), "$0.00");
    }

    #[test]
    fn test_number_groups_and_trims() {
        assert_eq!(format_value(&json!(1234567), EnumColumnFormat::Number), "1,234,567");
        assert_eq!(format_value(&json!(1234.5678), EnumColumnFormat::Number), "1,234.568");
        assert_eq!(format_value(&json!(0.5), EnumColumnFormat::Number), "0.5");
        assert_eq!(format_value(&json!(-999.0001), EnumColumnFormat::Number), "-999");
        assert_eq!(format_value(&json!(-0.0001), EnumColumnFormat::Number), "0");
    }

    #[test]
    fn test_number_malformed_degrades_to_zero() {
        assert_eq!(format_value(&json!("abc"), EnumColumnFormat::Number), "0");
        assert_eq!(format_value(&json!(""), EnumColumnFormat::Number), "0");
        assert_eq!(format_value(&Value::Null, EnumColumnFormat::Number), "0");
        assert_eq!(format_value(&json!("NaN"), EnumColumnFormat::Number), "0");
        assert_eq!(format_value(&json!(true), EnumColumnFormat::Number), "1");
        assert_eq!(format_value(&json!(" 42 "), EnumColumnFormat::Number), "42");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_value(&json!(0.125), EnumColumnFormat::Percentage), "12.50%");
        assert_eq!(format_value(&json!("1"), EnumColumnFormat::Percentage), "100.00%");
        assert_eq!(format_value(&json!(-0.00001), EnumColumnFormat::Percentage), "0.00%");
    }

    #[test]
    fn test_text_never_prints_null() {
        assert_eq!(format_value(&Value::Null, EnumColumnFormat::Text), "");
        assert_eq!(format_value(&json!(3.0), EnumColumnFormat::Text), "3");
        assert_eq!(format_value(&json!(3.25), EnumColumnFormat::Text), "3.25");
        assert_eq!(format_value(&json!(false), EnumColumnFormat::Text), "false");
        assert_eq!(format_value(&json!(["a", 1]), EnumColumnFormat::Text), r#"["a",1]"#);
    }

    #[test]
    fn test_text_large_whole_floats_print_as_integers() {
        assert_eq!(format_value(&json!(1e15), EnumColumnFormat::Text), "1000000000000000");
        assert_eq!(format_value(&json!(1e16), EnumColumnFormat::Text), "10000000000000000");
        assert_eq!(format_value(&json!(-2.5e18), EnumColumnFormat::Text), "-2500000000000000000");
        assert_eq!(format_value(&json!(-0.0), EnumColumnFormat::Text), "0");
    }

    #[test]
    fn test_format_is_idempotent() {
        let l_values = [
            json!(null),
            json!("2024-03-05T00:00:00Z"),
            json!(1234.5),
            json!("x"),
            json!(0.3333),
        ];
        let l_formats = [
            EnumColumnFormat::Text,
            EnumColumnFormat::Number,
            EnumColumnFormat::Currency,
            EnumColumnFormat::Date,
            EnumColumnFormat::Percentage,
        ];
        for value in &l_values {
            for format in l_formats {
                assert_eq!(format_value(value, format), format_value(value, format));
            }
        }
    }

    #[test]
    fn test_typed_values() {
        assert_eq!(
            derive_typed_value(&json!("12.5"), EnumColumnFormat::Currency),
            EnumCellValue::Number(12.5)
        );
        assert_eq!(
            derive_typed_value(&json!("2024-03-05"), EnumColumnFormat::Date),
            EnumCellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
        assert_eq!(derive_typed_value(&Value::Null, EnumColumnFormat::Text), EnumCellValue::None);
    }

    #[test]
    fn test_long_timestamp_is_spanish() {
        let dt = DateTime::parse_from_rfc3339("2024-03-05T14:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let c_text = format_long_timestamp(dt);
        assert!(c_text.starts_with("5 de marzo de 2024"), "{c_text}");
        assert!(c_text.ends_with("14:30 UTC"), "{c_text}");
    }
}
