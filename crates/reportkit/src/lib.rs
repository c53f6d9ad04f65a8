//! `reportkit` v1:
//! Tabular report engine: one set of options, a styled workbook and a
//! paginated document.
//!
//! Architecture:
//! - `reportkit_core`    : data model, inference, formatting, layout
//! - `reportkit_io_xlsx` : spreadsheet renderer kernel
//! - `reportkit_io_pdf`  : document renderer kernel
pub use reportkit_core::{
    EnumColumnAlign, EnumColumnFormat, EnumExportKind, Record, ReportError, ReportResult,
    SpecArtifact, SpecBranding, SpecColumn, SpecCompanyInfo, SpecExportResult, SpecReportMeta,
    SpecReportMetadata, SpecReportOptions, derive_records_from_dataframe,
    derive_records_from_ipc_bytes, prepare_options, prepare_options_at,
};
pub use reportkit_io_pdf::{SpecPdfReport, SpecPdfWriteOptions, render_document};
pub use reportkit_io_xlsx::{SpecXlsxReport, SpecXlsxWriteOptions, render_spreadsheet};

/// Render `options` into the artifact of `kind`.
pub fn render(kind: EnumExportKind, options: &SpecReportOptions) -> SpecExportResult {
    match kind {
        EnumExportKind::Spreadsheet => render_spreadsheet(options),
        EnumExportKind::Document => render_document(options),
    }
}

/// Render both artifacts, spreadsheet first.
pub fn render_all(options: &SpecReportOptions) -> [SpecExportResult; 2] {
    tracing::debug!(title = %options.title, n_rows = options.data.len(), "rendering all artifacts");
    [
        render(EnumExportKind::Spreadsheet, options),
        render(EnumExportKind::Document, options),
    ]
}

/// Decode options sent as JSON by a boundary.
pub fn parse_report_options(payload: &str) -> ReportResult<SpecReportOptions> {
    let options: SpecReportOptions = serde_json::from_str(payload)?;
    if options.columns.is_empty() {
        return Err(ReportError::NoColumns);
    }
    Ok(options)
}
