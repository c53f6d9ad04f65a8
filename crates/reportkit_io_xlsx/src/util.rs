//! Stateless helper utilities used by the XLSX writer kernel.

use chrono::{Datelike, NaiveDate};
use reportkit_core::error::{ReportError, ReportResult};
use reportkit_core::spec::{EnumColumnAlign, SpecColumn, SpecReportOptions};
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, XlsxError};

use crate::conf::{
    C_COLOR_ROW_ALT, C_SHEET_NAME_DEFAULT, N_LEN_EXCEL_CELL_TEXT_MAX, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{SpecCellFormat, SpecSheetRowPlan};

////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').trim().to_string();
    if c_name.is_empty() {
        c_name = C_SHEET_NAME_DEFAULT.to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Cut `text` to the Excel cell limit, ending with `"..."`; `None` when it fits.
pub fn derive_clamped_cell_text(text: &str) -> Option<String> {
    text.chars().nth(N_LEN_EXCEL_CELL_TEXT_MAX)?;
    let n_idx_cut = text
        .char_indices()
        .nth(N_LEN_EXCEL_CELL_TEXT_MAX - 3)
        .map_or(text.len(), |(n_idx, _)| n_idx);
    Some(format!("{}...", &text[..n_idx_cut]))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SectionPlanning

/// Place every report section on its worksheet row, top to bottom.
pub fn plan_sheet_rows(options: &SpecReportOptions) -> SpecSheetRowPlan {
    let mut n_row = 0usize;
    let mut row_company = None;
    let mut row_contact = None;
    if let Some(company) = &options.company_info {
        row_company = Some(n_row);
        n_row += 1;
        if company.contact_line().is_some() {
            row_contact = Some(n_row);
            n_row += 1;
        }
        // spacer
        n_row += 1;
    }

    let row_title = n_row;
    n_row += 1;
    let row_subtitle = match options.subtitle.as_deref().map(str::trim) {
        Some(c_subtitle) if !c_subtitle.is_empty() => {
            n_row += 1;
            Some(n_row - 1)
        }
        _ => None,
    };
    let row_meta = n_row;
    // meta + spacer
    n_row += 2;

    let row_header = n_row;
    let row_data_start = row_header + 1;
    let row_footer = row_data_start + options.data.len() + 1;

    SpecSheetRowPlan {
        row_company,
        row_contact,
        row_title,
        row_subtitle,
        row_meta,
        row_header,
        row_data_start,
        row_footer,
    }
}

/// Fail early when the planned grid exceeds worksheet limits.
pub fn validate_sheet_extent(plan: &SpecSheetRowPlan, n_cols: usize) -> ReportResult<()> {
    if plan.row_footer >= N_NROWS_EXCEL_MAX {
        return Err(ReportError::IndexOverflow(format!(
            "report needs {} rows; worksheet limit is {N_NROWS_EXCEL_MAX}",
            plan.row_footer + 1
        )));
    }
    if n_cols > N_NCOLS_EXCEL_MAX {
        return Err(ReportError::IndexOverflow(format!(
            "report has {n_cols} columns; worksheet limit is {N_NCOLS_EXCEL_MAX}"
        )));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatBridge

/// Data cell format for `column`; odd rows take the alternate fill.
pub fn derive_column_cell_format(
    fmt_body: &SpecCellFormat,
    column: &SpecColumn,
    if_row_alt: bool,
) -> SpecCellFormat {
    let c_align = match column.align {
        EnumColumnAlign::Left => "left",
        EnumColumnAlign::Center => "center",
        EnumColumnAlign::Right => "right",
    };
    fmt_body.with_(SpecCellFormat {
        align: Some(c_align.to_string()),
        num_format: column.format.num_format().map(str::to_string),
        bg_color: if_row_alt.then(|| C_COLOR_ROW_ALT.to_string()),
        ..Default::default()
    })
}

/// Convert a format spec into a `rust_xlsxwriter` format.
pub fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = &spec.border_color {
        format = format.set_border_color(val.as_str());
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Casting

pub fn cast_row_num(value: usize) -> ReportResult<u32> {
    u32::try_from(value)
        .map_err(|_| ReportError::IndexOverflow(format!("row index overflow: {value}")))
}

pub fn cast_col_num(value: usize) -> ReportResult<u16> {
    u16::try_from(value)
        .map_err(|_| ReportError::IndexOverflow(format!("column index overflow: {value}")))
}

pub fn derive_xlsx_error(err: XlsxError) -> ReportError {
    ReportError::Xlsx(err.to_string())
}

/// Excel date for `date`; `None` outside the range Excel can represent.
pub fn derive_excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    let n_year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(n_year, date.month() as u8, date.day() as u8).ok()
}

/// Workbook creation timestamp from unix seconds.
pub fn derive_excel_timestamp(n_secs: i64) -> ReportResult<ExcelDateTime> {
    ExcelDateTime::from_timestamp(n_secs).map_err(derive_xlsx_error)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
