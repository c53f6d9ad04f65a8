//! Shared XLSX specification models.

use reportkit_core::conf::derive_default_sheet_layout_policy;
use reportkit_core::layout::SpecLayoutPolicy;

use crate::conf::C_FONT_NAME_DEFAULT;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification; `None` fields are left at workbook defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Border color for all sides.
    pub border_color: Option<String>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            border_color: other
                .border_color
                .clone()
                .or_else(|| self.border_color.clone()),
            text_wrap: other.text_wrap.or(self.text_wrap),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Writer-wide options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecXlsxWriteOptions {
    /// Font family for every cell.
    pub font_name: String,
    /// Freeze the rows above the first data row.
    pub if_freeze_header: bool,
    /// Stamp document properties into the workbook.
    pub if_write_properties: bool,
    /// Column width policy (character-width units).
    pub policy_layout: SpecLayoutPolicy,
    /// Replacement for characters Excel rejects in sheet names.
    pub sheet_name_replace_to: String,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            font_name: C_FONT_NAME_DEFAULT.to_string(),
            if_freeze_header: true,
            if_write_properties: true,
            policy_layout: derive_default_sheet_layout_policy(),
            sheet_name_replace_to: "_".to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetFormatSpecification

/// Zero-based worksheet row of every report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetRowPlan {
    pub row_company: Option<usize>,
    pub row_contact: Option<usize>,
    pub row_title: usize,
    pub row_subtitle: Option<usize>,
    pub row_meta: usize,
    pub row_header: usize,
    /// First data row; data occupies `row_data_start..row_data_start + n`.
    pub row_data_start: usize,
    pub row_footer: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecXlsxReport {
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    /// Zero-based table header row.
    pub row_header: usize,
    /// Number of data rows written.
    pub n_rows_data: usize,
    /// Final column widths (character units).
    pub widths: Vec<f64>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_format_merge_prefers_patch() {
        let base = SpecCellFormat {
            font_size: Some(11),
            bold: Some(false),
            border_color: Some("#D9D9D9".to_string()),
            ..Default::default()
        };
        let merged = base.with_(SpecCellFormat {
            bold: Some(true),
            num_format: Some("#,##0".to_string()),
            ..Default::default()
        });
        assert_eq!(merged.font_size, Some(11));
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.border_color.as_deref(), Some("#D9D9D9"));
        assert_eq!(merged.num_format.as_deref(), Some("#,##0"));
    }
}
