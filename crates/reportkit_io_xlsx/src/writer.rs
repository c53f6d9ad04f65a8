//! XLSX writer kernel that renders report options into a styled workbook.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use reportkit_core::conf::{C_AUTHOR_DEFAULT, C_ATTRIBUTION};
use reportkit_core::error::{ReportError, ReportResult};
use reportkit_core::export::run_export;
use reportkit_core::format::{derive_typed_value, format_value};
use reportkit_core::layout::plan_column_layout;
use reportkit_core::metrics::CharUnitMeasure;
use reportkit_core::spec::{EnumCellValue, EnumExportKind, SpecExportResult, SpecReportOptions};
use rust_xlsxwriter::{DocProperties, Format, Workbook, Worksheet};

use crate::conf::{
    EnumFmtKey, N_HEIGHT_ROW_BANNER, N_HEIGHT_ROW_HEADER, N_LEN_EXCEL_CELL_TEXT_MAX,
    N_LEN_EXCEL_SHEET_NAME_MAX, derive_default_xlsx_formats,
};
use crate::spec::{SpecCellFormat, SpecSheetRowPlan, SpecXlsxReport, SpecXlsxWriteOptions};
use crate::util::{
    cast_col_num, cast_row_num, derive_clamped_cell_text, derive_column_cell_format,
    derive_excel_date, derive_excel_timestamp, derive_rust_xlsx_format, derive_xlsx_error, plan_sheet_rows,
    sanitize_sheet_name, validate_sheet_extent,
};

/// Workbook builder; one report per worksheet, buffered in memory.
pub struct XlsxWriter {
    workbook: Workbook,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
}

impl XlsxWriter {
    pub fn new(write_options: SpecXlsxWriteOptions) -> Self {
        Self {
            workbook: Workbook::new(),
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
        }
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Serialize the workbook to xlsx bytes.
    pub fn save_to_buffer(&mut self) -> ReportResult<Vec<u8>> {
        self.workbook.save_to_buffer().map_err(derive_xlsx_error)
    }

    /// Render `options` into a new worksheet named after the report title.
    pub fn write_report_sheet(&mut self, options: &SpecReportOptions) -> ReportResult<()> {
        if options.columns.is_empty() {
            return Err(ReportError::NoColumns);
        }
        let plan = plan_sheet_rows(options);
        validate_sheet_extent(&plan, options.columns.len())?;
        self.write_options.policy_layout.validate()?;

        let mut report = SpecXlsxReport::default();
        let c_sheet_name = sanitize_sheet_name(
            &options.title,
            &self.write_options.sheet_name_replace_to,
        );
        if c_sheet_name != options.title {
            tracing::warn!(title = %options.title, sheet_name = %c_sheet_name, "sanitized sheet name");
            report.warn(format!(
                "Sheet name sanitized from `{}` to `{c_sheet_name}`.",
                options.title
            ));
        }
        let sheet_name_unique = self.derive_unique_sheet_name(&c_sheet_name);

        let palette = options.palette();
        let generated_at = options.generated_at();
        let dict_fmt = derive_default_xlsx_formats(&palette, &self.write_options.font_name);
        let layout = plan_column_layout(
            &options.columns,
            &options.data,
            &self.write_options.policy_layout,
            &CharUnitMeasure,
        )?;

        if self.write_options.if_write_properties {
            let properties = derive_doc_properties(options, generated_at)?;
            self.workbook.set_properties(&properties);
        }

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(sheet_name_unique.as_str())
            .map_err(derive_xlsx_error)?;
        worksheet.set_tab_color(palette.primary.as_str());

        let n_cols = options.columns.len();
        write_sections(
            worksheet,
            &mut report,
            options,
            &plan,
            &dict_fmt,
            generated_at,
            n_cols,
        )?;
        write_table(worksheet, &mut report, options, &plan, &dict_fmt)?;

        for (n_idx_col, n_width) in layout.widths.iter().enumerate() {
            worksheet
                .set_column_width(cast_col_num(n_idx_col)?, *n_width)
                .map_err(derive_xlsx_error)?;
        }
        if self.write_options.if_freeze_header {
            worksheet
                .set_freeze_panes(cast_row_num(plan.row_data_start)?, 0)
                .map_err(derive_xlsx_error)?;
        }

        tracing::debug!(
            sheet_name = %sheet_name_unique,
            row_header = plan.row_header,
            n_rows = options.data.len(),
            n_cols,
            "wrote report sheet"
        );

        report.sheet_name = sheet_name_unique;
        report.row_header = plan.row_header;
        report.n_rows_data = options.data.len();
        report.widths = layout.widths;
        self.l_reports.push(report);
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 4))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name} ({n_idx})")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

/// Render one report into xlsx bytes with default writer options.
pub fn write_spreadsheet(options: &SpecReportOptions) -> ReportResult<(Vec<u8>, SpecXlsxReport)> {
    write_spreadsheet_with(options, SpecXlsxWriteOptions::default())
}

/// Render one report into xlsx bytes.
pub fn write_spreadsheet_with(
    options: &SpecReportOptions,
    write_options: SpecXlsxWriteOptions,
) -> ReportResult<(Vec<u8>, SpecXlsxReport)> {
    let mut writer = XlsxWriter::new(write_options);
    writer.write_report_sheet(options)?;
    let bytes = writer.save_to_buffer()?;
    let report = writer.l_reports.pop().unwrap_or_default();
    Ok((bytes, report))
}

/// Render the spreadsheet artifact; failures become a failed result.
pub fn render_spreadsheet(options: &SpecReportOptions) -> SpecExportResult {
    run_export(EnumExportKind::Spreadsheet, &options.filename, || {
        write_spreadsheet(options).map(|(bytes, _report)| bytes)
    })
}

////////////////////////////////////////////////////////////////////////////////
// #region Sections

fn write_sections(
    worksheet: &mut Worksheet,
    report: &mut SpecXlsxReport,
    options: &SpecReportOptions,
    plan: &SpecSheetRowPlan,
    dict_fmt: &BTreeMap<EnumFmtKey, SpecCellFormat>,
    generated_at: DateTime<Utc>,
    n_cols: usize,
) -> ReportResult<()> {
    if let (Some(company), Some(row_company)) = (&options.company_info, plan.row_company) {
        write_section_row(
            worksheet,
            report,
            row_company,
            n_cols,
            &company.name,
            &derive_preset_format(dict_fmt, EnumFmtKey::Banner),
        )?;
        worksheet
            .set_row_height(cast_row_num(row_company)?, N_HEIGHT_ROW_BANNER)
            .map_err(derive_xlsx_error)?;

        if let (Some(c_contact), Some(row_contact)) = (company.contact_line(), plan.row_contact) {
            write_section_row(
                worksheet,
                report,
                row_contact,
                n_cols,
                &c_contact,
                &derive_preset_format(dict_fmt, EnumFmtKey::Contact),
            )?;
        }
    }

    write_section_row(
        worksheet,
        report,
        plan.row_title,
        n_cols,
        &options.title,
        &derive_preset_format(dict_fmt, EnumFmtKey::Title),
    )?;
    if let (Some(c_subtitle), Some(row_subtitle)) = (&options.subtitle, plan.row_subtitle) {
        write_section_row(
            worksheet,
            report,
            row_subtitle,
            n_cols,
            c_subtitle.trim(),
            &derive_preset_format(dict_fmt, EnumFmtKey::Subtitle),
        )?;
    }
    write_section_row(
        worksheet,
        report,
        plan.row_meta,
        n_cols,
        &options.metadata_line(generated_at),
        &derive_preset_format(dict_fmt, EnumFmtKey::Meta),
    )?;
    write_section_row(
        worksheet,
        report,
        plan.row_footer,
        n_cols,
        &options.summary_line(),
        &derive_preset_format(dict_fmt, EnumFmtKey::Footer),
    )?;
    Ok(())
}

/// Full-width section row; a single column gets a plain cell since a
/// one-cell merge is rejected by Excel.
fn write_section_row(
    worksheet: &mut Worksheet,
    report: &mut SpecXlsxReport,
    row_idx: usize,
    n_cols: usize,
    text: &str,
    format: &Format,
) -> ReportResult<()> {
    let n_row = cast_row_num(row_idx)?;
    let c_text = clamp_cell_text(report, text, n_row, 0);
    let text = c_text.as_ref();
    if n_cols > 1 {
        worksheet
            .merge_range(n_row, 0, n_row, cast_col_num(n_cols - 1)?, text, format)
            .map_err(derive_xlsx_error)?;
    } else {
        worksheet
            .write_string_with_format(n_row, 0, text, format)
            .map_err(derive_xlsx_error)?;
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Table

fn write_table(
    worksheet: &mut Worksheet,
    report: &mut SpecXlsxReport,
    options: &SpecReportOptions,
    plan: &SpecSheetRowPlan,
    dict_fmt: &BTreeMap<EnumFmtKey, SpecCellFormat>,
) -> ReportResult<()> {
    let fmt_header = derive_preset_format(dict_fmt, EnumFmtKey::Header);
    let n_row_header = cast_row_num(plan.row_header)?;
    for (n_idx_col, column) in options.columns.iter().enumerate() {
        let n_col = cast_col_num(n_idx_col)?;
        let c_label = clamp_cell_text(report, &column.label, n_row_header, n_col);
        worksheet
            .write_string_with_format(n_row_header, n_col, c_label.as_ref(), &fmt_header)
            .map_err(derive_xlsx_error)?;
    }
    worksheet
        .set_row_height(n_row_header, N_HEIGHT_ROW_HEADER)
        .map_err(derive_xlsx_error)?;

    let fmt_body = dict_fmt.get(&EnumFmtKey::Body).cloned().unwrap_or_default();
    let l_fmt_by_col: Vec<[Format; 2]> = options
        .columns
        .iter()
        .map(|column| {
            [
                derive_rust_xlsx_format(&derive_column_cell_format(&fmt_body, column, false)),
                derive_rust_xlsx_format(&derive_column_cell_format(&fmt_body, column, true)),
            ]
        })
        .collect();

    for (n_idx_row, record) in options.data.iter().enumerate() {
        let n_row = cast_row_num(plan.row_data_start + n_idx_row)?;
        for (n_idx_col, column) in options.columns.iter().enumerate() {
            let format = &l_fmt_by_col[n_idx_col][n_idx_row % 2];
            let value = column.value_of(record);
            write_cell_with_format(
                worksheet,
                report,
                n_row,
                cast_col_num(n_idx_col)?,
                &derive_typed_value(value, column.format),
                || format_value(value, column.format),
                format,
            )?;
        }
    }
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    report: &mut SpecXlsxReport,
    n_row: u32,
    n_col: u16,
    value: &EnumCellValue,
    derive_text: impl FnOnce() -> String,
    format: &Format,
) -> ReportResult<()> {
    match value {
        EnumCellValue::None => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::String(val) => {
            let c_text = clamp_cell_text(report, val, n_row, n_col);
            worksheet
                .write_string_with_format(n_row, n_col, c_text.as_ref(), format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Date(val) => match derive_excel_date(*val) {
            Some(datetime) => {
                worksheet
                    .write_datetime_with_format(n_row, n_col, &datetime, format)
                    .map_err(derive_xlsx_error)?;
            }
            None => {
                let c_raw = derive_text();
                let c_text = clamp_cell_text(report, &c_raw, n_row, n_col);
                worksheet
                    .write_string_with_format(n_row, n_col, c_text.as_ref(), format)
                    .map_err(derive_xlsx_error)?;
            }
        },
    }
    Ok(())
}

/// Cell text within the Excel limit; every cut is logged and reported.
fn clamp_cell_text<'a>(
    report: &mut SpecXlsxReport,
    text: &'a str,
    n_row: u32,
    n_col: u16,
) -> Cow<'a, str> {
    match derive_clamped_cell_text(text) {
        None => Cow::Borrowed(text),
        Some(c_clamped) => {
            let n_chars = text.chars().count();
            tracing::warn!(row = n_row, col = n_col, n_chars, "clamped cell text");
            report.warn(format!(
                "Cell ({n_row}, {n_col}) text clamped from {n_chars} to \
                 {N_LEN_EXCEL_CELL_TEXT_MAX} characters."
            ));
            Cow::Owned(c_clamped)
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Properties

fn derive_doc_properties(
    options: &SpecReportOptions,
    generated_at: DateTime<Utc>,
) -> ReportResult<DocProperties> {
    let metadata = options.metadata.clone().unwrap_or_default();
    let mut properties = DocProperties::new()
        .set_title(options.title.as_str())
        .set_subject(metadata.subject.as_deref().unwrap_or(&options.title))
        .set_author(metadata.author.as_deref().unwrap_or(C_AUTHOR_DEFAULT))
        .set_comment(C_ATTRIBUTION)
        .set_creation_datetime(&derive_excel_timestamp(generated_at.timestamp())?);
    if let Some(c_department) = options.department() {
        properties = properties.set_manager(c_department);
    }
    if let Some(company) = &options.company_info {
        properties = properties.set_company(company.name.as_str());
    }
    if let Some(c_category) = metadata.category.as_deref() {
        properties = properties.set_category(c_category);
    }
    if !metadata.keywords.is_empty() {
        let c_keywords = metadata.keywords.join(", ");
        properties = properties.set_keywords(c_keywords.as_str());
    }
    Ok(properties)
}

fn derive_preset_format(
    dict_fmt: &BTreeMap<EnumFmtKey, SpecCellFormat>,
    key: EnumFmtKey,
) -> Format {
    dict_fmt
        .get(&key)
        .map(derive_rust_xlsx_format)
        .unwrap_or_default()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
