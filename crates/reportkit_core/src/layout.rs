//! Column width planning shared by the spreadsheet and document kernels.

use crate::error::{ReportError, ReportResult};
use crate::format::format_value;
use crate::metrics::{EnumFontWeight, TextMeasure};
use crate::spec::{Record, SpecColumn};
use crate::util::flatten_single_line;

/// Absolute tolerance for the fit-to-width sum check.
pub const N_WIDTH_SUM_TOLERANCE: f64 = 1e-6;

////////////////////////////////////////////////////////////////////////////////
// #region LayoutPolicy

/// How candidate widths relate to the output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumLayoutMode {
    /// Each column clamped to `[width_min, width_max]`; no total width.
    #[default]
    Unconstrained,
    /// Widths scaled uniformly so they sum to `width_available`.
    FitToWidth,
}

/// Width planning policy. Units are whatever the paired `TextMeasure` returns.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecLayoutPolicy {
    /// Layout mode.
    pub rule_mode: EnumLayoutMode,
    /// Floor applied to every candidate.
    pub width_min: f64,
    /// Cap applied in `Unconstrained` mode.
    pub width_max: f64,
    /// Added to measured label and content widths.
    pub width_padding: f64,
    /// Drawable width in `FitToWidth` mode.
    pub width_available: f64,
    /// Max body rows measured; `None` measures every row.
    pub height_body_inferred_max: Option<usize>,
}

impl Default for SpecLayoutPolicy {
    fn default() -> Self {
        crate::conf::derive_default_sheet_layout_policy()
    }
}

impl SpecLayoutPolicy {
    pub fn validate(&self) -> ReportResult<()> {
        if !self.width_min.is_finite() || self.width_min < 0.0 {
            return Err(ReportError::InvalidLayoutPolicy(
                "width_min must be a finite value >= 0.".to_string(),
            ));
        }
        if self.width_max.is_nan() || self.width_max < self.width_min {
            return Err(ReportError::InvalidLayoutPolicy(
                "width_max must be >= width_min.".to_string(),
            ));
        }
        if !self.width_padding.is_finite() || self.width_padding < 0.0 {
            return Err(ReportError::InvalidLayoutPolicy(
                "width_padding must be a finite value >= 0.".to_string(),
            ));
        }
        if self.rule_mode == EnumLayoutMode::FitToWidth
            && (!self.width_available.is_finite() || self.width_available <= 0.0)
        {
            return Err(ReportError::InvalidLayoutPolicy(
                "width_available must be > 0 in fit-to-width mode.".to_string(),
            ));
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnLayout

/// Planned widths for one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecColumnLayout {
    /// Final width per column.
    pub widths: Vec<f64>,
    /// Cumulative left offset per column; `offsets[0] == 0`.
    pub offsets: Vec<f64>,
    /// Candidates before fit-to-width scaling.
    pub candidates: Vec<f64>,
    /// Uniform scale applied to the candidates (`1.0` when unconstrained).
    pub ratio_scale: f64,
}

impl SpecColumnLayout {
    pub fn width_total(&self) -> f64 {
        self.widths.iter().sum()
    }

    /// Number of planned columns.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

/// Plan column widths for `columns` over `records`.
///
/// Labels are measured bold and cell contents regular, after formatting, so a
/// currency column is sized by `"$1,234.56"` and not by `1234.56`.
pub fn plan_column_layout(
    columns: &[SpecColumn],
    records: &[Record],
    policy: &SpecLayoutPolicy,
    measure: &dyn TextMeasure,
) -> ReportResult<SpecColumnLayout> {
    if columns.is_empty() {
        return Err(ReportError::NoColumns);
    }
    policy.validate()?;

    let n_rows_measured = policy
        .height_body_inferred_max
        .map_or(records.len(), |n_max| usize::min(n_max, records.len()));

    let l_candidates: Vec<f64> = columns
        .iter()
        .map(|column| {
            let n_width_label = measure.measure(&column.label, EnumFontWeight::Bold);
            let n_width_content = records[..n_rows_measured]
                .iter()
                .map(|record| {
                    let c_text = flatten_single_line(&format_value(
                        column.value_of(record),
                        column.format,
                    ));
                    measure.measure(&c_text, EnumFontWeight::Regular)
                })
                .fold(0.0_f64, f64::max);
            derive_candidate_width(column, n_width_label, n_width_content, policy)
        })
        .collect();

    let (l_widths, n_ratio) = match policy.rule_mode {
        EnumLayoutMode::Unconstrained => (l_candidates.clone(), 1.0),
        EnumLayoutMode::FitToWidth => fit_to_width(&l_candidates, policy.width_available),
    };

    let mut l_offsets = Vec::with_capacity(l_widths.len());
    let mut n_offset = 0.0;
    for n_width in &l_widths {
        l_offsets.push(n_offset);
        n_offset += n_width;
    }

    tracing::debug!(
        mode = ?policy.rule_mode,
        n_cols = columns.len(),
        n_rows_measured,
        ratio_scale = n_ratio,
        "planned column layout"
    );

    Ok(SpecColumnLayout {
        widths: l_widths,
        offsets: l_offsets,
        candidates: l_candidates,
        ratio_scale: n_ratio,
    })
}

fn derive_candidate_width(
    column: &SpecColumn,
    width_label: f64,
    width_content: f64,
    policy: &SpecLayoutPolicy,
) -> f64 {
    let n_candidate = f64::max(
        f64::max(width_label, width_content) + policy.width_padding,
        policy.width_min,
    );
    match policy.rule_mode {
        EnumLayoutMode::Unconstrained => {
            let n_hint = column.width.filter(|val| val.is_finite()).unwrap_or(0.0);
            f64::max(n_candidate, n_hint).clamp(policy.width_min, policy.width_max)
        }
        EnumLayoutMode::FitToWidth => n_candidate,
    }
}

/// Scale `candidates` by `available / sum`; the last column absorbs rounding
/// so the widths add up to `available`.
fn fit_to_width(candidates: &[f64], width_available: f64) -> (Vec<f64>, f64) {
    let n_sum: f64 = candidates.iter().sum();
    if n_sum <= 0.0 {
        let n_width = width_available / candidates.len() as f64;
        return (vec![n_width; candidates.len()], 1.0);
    }
    let n_ratio = width_available / n_sum;
    let mut l_widths: Vec<f64> = candidates.iter().map(|val| val * n_ratio).collect();
    let n_head: f64 = l_widths[..l_widths.len() - 1].iter().sum();
    if let Some(n_last) = l_widths.last_mut() {
        *n_last = width_available - n_head;
    }
    (l_widths, n_ratio)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::{derive_default_document_layout_policy, derive_default_sheet_layout_policy};
    use crate::metrics::{CharUnitMeasure, HelveticaMeasure};
    use crate::spec::EnumColumnFormat;
    use serde_json::json;

    fn derive_records(key: &str, values: &[serde_json::Value]) -> Vec<Record> {
        values
            .iter()
            .map(|val| {
                let mut record = Record::new();
                record.insert(key.to_string(), val.clone());
                record
            })
            .collect()
    }

    #[test]
    fn test_sheet_widths_are_floored_and_capped() {
        let columns = vec![
            SpecColumn::new("id", "ID", EnumColumnFormat::Number),
            SpecColumn::new("note", "Nota", EnumColumnFormat::Text),
        ];
        let mut record = Record::new();
        record.insert("id".to_string(), json!(7));
        record.insert("note".to_string(), json!("x".repeat(200)));

        let layout = plan_column_layout(
            &columns,
            &[record],
            &derive_default_sheet_layout_policy(),
            &CharUnitMeasure,
        )
        .unwrap();
        assert_eq!(layout.widths, vec![12.0, 60.0]);
        assert_eq!(layout.offsets, vec![0.0, 12.0]);
        assert_eq!(layout.ratio_scale, 1.0);
    }

    #[test]
    fn test_sheet_width_hint_raises_floor() {
        let columns = vec![SpecColumn::new("d", "D", EnumColumnFormat::Date).with_width(18.0)];
        let layout = plan_column_layout(
            &columns,
            &[],
            &derive_default_sheet_layout_policy(),
            &CharUnitMeasure,
        )
        .unwrap();
        assert_eq!(layout.widths, vec![18.0]);
    }

    #[test]
    fn test_sheet_measures_formatted_currency() {
        let columns = vec![SpecColumn::new("amount", "M", EnumColumnFormat::Currency)];
        let records = derive_records("amount", &[json!(1234567.5)]);
        let layout = plan_column_layout(
            &columns,
            &records,
            &derive_default_sheet_layout_policy(),
            &CharUnitMeasure,
        )
        .unwrap();
        // "$1,234,567.50" is 13 units, plus padding 2.
        assert_eq!(layout.widths, vec![15.0]);
    }

    #[test]
    fn test_document_widths_sum_to_available() {
        let columns = vec![
            SpecColumn::new("a", "Alpha", EnumColumnFormat::Text),
            SpecColumn::new("b", "Beta", EnumColumnFormat::Text),
            SpecColumn::new("c", "Gamma", EnumColumnFormat::Text),
        ];
        let mut record = Record::new();
        record.insert("a".to_string(), json!("lorem ipsum ".repeat(40)));
        record.insert("b".to_string(), json!("short"));
        record.insert("c".to_string(), json!("dolor sit amet ".repeat(30)));

        let measure = HelveticaMeasure::new(9.0, 8.0);
        let policy = derive_default_document_layout_policy(267.0);
        let layout = plan_column_layout(&columns, &[record], &policy, &measure).unwrap();

        assert!((layout.width_total() - 267.0).abs() < N_WIDTH_SUM_TOLERANCE);
        assert!(layout.ratio_scale < 1.0);
        assert!(layout.candidates.iter().all(|val| *val >= 25.0));
        for (n_width, n_candidate) in layout.widths.iter().zip(&layout.candidates) {
            assert!((n_width / n_candidate - layout.ratio_scale).abs() < 1e-9);
        }
    }

    #[test]
    fn test_document_widths_stretch_when_narrow() {
        let columns = vec![SpecColumn::new("a", "A", EnumColumnFormat::Text)];
        let measure = HelveticaMeasure::new(9.0, 8.0);
        let policy = derive_default_document_layout_policy(267.0);
        let layout = plan_column_layout(&columns, &[], &policy, &measure).unwrap();
        assert_eq!(layout.candidates, vec![25.0]);
        assert!((layout.widths[0] - 267.0).abs() < N_WIDTH_SUM_TOLERANCE);
    }

    #[test]
    fn test_measurement_respects_row_limit() {
        let columns = vec![SpecColumn::new("t", "T", EnumColumnFormat::Text)];
        let records = derive_records("t", &[json!("a"), json!("b".repeat(40))]);
        let mut policy = derive_default_sheet_layout_policy();
        policy.height_body_inferred_max = Some(1);
        let layout = plan_column_layout(&columns, &records, &policy, &CharUnitMeasure).unwrap();
        assert_eq!(layout.widths, vec![12.0]);
    }

    #[test]
    fn test_plan_rejects_empty_columns_and_bad_policy() {
        let err = plan_column_layout(
            &[],
            &[],
            &derive_default_sheet_layout_policy(),
            &CharUnitMeasure,
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::NoColumns));

        let columns = vec![SpecColumn::new("a", "A", EnumColumnFormat::Text)];
        let err = plan_column_layout(
            &columns,
            &[],
            &derive_default_document_layout_policy(0.0),
            &CharUnitMeasure,
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::InvalidLayoutPolicy(_)));
    }
}
