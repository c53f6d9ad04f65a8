//! PDF page geometry, typography and default preset factories.
//!
//! Lengths are millimetres measured from the top-left page corner; the writer
//! converts to PDF points (bottom-left origin) when drawing.

use reportkit_core::conf::derive_default_document_layout_policy;
use reportkit_core::layout::SpecLayoutPolicy;

use crate::spec::SpecPdfWriteOptions;

////////////////////////////////////////////////////////////////////////////////
// #region Geometry

/// A4 landscape width.
pub const N_PAGE_WIDTH_MM: f64 = 297.0;
/// A4 landscape height.
pub const N_PAGE_HEIGHT_MM: f64 = 210.0;
pub const N_MARGIN_MM: f64 = 15.0;
/// Colored banner at the top of page 1.
pub const N_HEIGHT_BAND_MM: f64 = 28.0;
pub const N_HEIGHT_TABLE_HEADER_MM: f64 = 9.0;
pub const N_HEIGHT_ROW_MM: f64 = 7.0;
/// Space kept free above the bottom edge for the page footer.
pub const N_FOOTER_RESERVE_MM: f64 = 18.0;
/// Horizontal inner padding of a cell, both sides together.
pub const N_CELL_PADDING_MM: f64 = 4.0;

pub const N_BASELINE_COMPANY_MM: f64 = 13.0;
pub const N_BASELINE_CONTACT_MM: f64 = 21.0;
/// Title baseline on page 1.
pub const N_BASELINE_TITLE_MM: f64 = N_HEIGHT_BAND_MM + 10.0;
pub const N_STEP_TITLE_MM: f64 = 7.0;
pub const N_STEP_SUBTITLE_MM: f64 = 6.0;
pub const N_STEP_META_MM: f64 = 5.0;
/// Baseline offsets from the top of a header band / body row.
pub const N_BASELINE_HEADER_OFFSET_MM: f64 = 5.8;
pub const N_BASELINE_ROW_OFFSET_MM: f64 = 4.7;
/// Footer separator line and text baseline.
pub const N_Y_FOOTER_RULE_MM: f64 = N_PAGE_HEIGHT_MM - N_FOOTER_RESERVE_MM + 4.0;
pub const N_BASELINE_FOOTER_MM: f64 = N_PAGE_HEIGHT_MM - 10.0;

/// Drawable table width between the side margins.
pub fn derive_width_drawable() -> f64 {
    N_PAGE_WIDTH_MM - 2.0 * N_MARGIN_MM
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Typography

pub const N_FONT_SIZE_COMPANY: f64 = 16.0;
pub const N_FONT_SIZE_CONTACT: f64 = 9.0;
pub const N_FONT_SIZE_TITLE: f64 = 16.0;
pub const N_FONT_SIZE_SUBTITLE: f64 = 11.0;
pub const N_FONT_SIZE_META: f64 = 9.0;
pub const N_FONT_SIZE_LABEL: f64 = 9.0;
pub const N_FONT_SIZE_BODY: f64 = 8.0;
pub const N_FONT_SIZE_FOOTER: f64 = 8.0;

/// Resource names of the two standard fonts.
pub const C_FONT_RES_REGULAR: &[u8] = b"F1";
pub const C_FONT_RES_BOLD: &[u8] = b"F2";
pub const C_FONT_BASE_REGULAR: &[u8] = b"Helvetica";
pub const C_FONT_BASE_BOLD: &[u8] = b"Helvetica-Bold";
pub const C_FONT_ENCODING: &[u8] = b"WinAnsiEncoding";

pub const C_ELLIPSIS: &str = "...";

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Colors

pub const C_COLOR_WHITE: &str = "#FFFFFF";
pub const C_COLOR_ROW_ALT: &str = "#F5F5F5";
pub const C_COLOR_BODY_TEXT: &str = "#333333";
pub const C_COLOR_META_TEXT: &str = "#666666";
pub const C_COLOR_FOOTER_TEXT: &str = "#808080";
pub const C_COLOR_RULE: &str = "#BFBFBF";

// #endregion
////////////////////////////////////////////////////////////////////////////////

pub const C_PDF_CREATOR: &str = "Sistema de Reportes";
pub const C_PDF_PRODUCER: &str = "reportkit";
/// zlib level for content streams.
pub const N_DEFLATE_LEVEL: u8 = 6;

/// Fit-to-width policy over the drawable table width.
pub fn derive_default_pdf_layout_policy() -> SpecLayoutPolicy {
    derive_default_document_layout_policy(derive_width_drawable())
}

/// Build default write options.
pub fn derive_default_pdf_write_options() -> SpecPdfWriteOptions {
    SpecPdfWriteOptions::default()
}
