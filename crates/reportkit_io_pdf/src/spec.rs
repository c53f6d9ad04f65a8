//! Shared PDF specification models.

use reportkit_core::layout::SpecLayoutPolicy;

use crate::conf::{N_FONT_SIZE_BODY, N_FONT_SIZE_LABEL, derive_default_pdf_layout_policy};

/// Writer-wide options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecPdfWriteOptions {
    /// Flate-compress page content streams.
    pub if_compress_streams: bool,
    /// Column width policy (millimetres).
    pub policy_layout: SpecLayoutPolicy,
    /// Header label size (pt), bold.
    pub font_size_label: f64,
    /// Body cell size (pt), regular.
    pub font_size_body: f64,
}

impl Default for SpecPdfWriteOptions {
    fn default() -> Self {
        Self {
            if_compress_streams: true,
            policy_layout: derive_default_pdf_layout_policy(),
            font_size_label: N_FONT_SIZE_LABEL,
            font_size_body: N_FONT_SIZE_BODY,
        }
    }
}

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecPdfReport {
    pub n_pages: usize,
    /// Table header bands drawn; one per page.
    pub n_header_bands: usize,
    /// Data rows drawn on each page.
    pub rows_by_page: Vec<usize>,
    /// Body cells drawn with an ellipsis (or emptied).
    pub n_cells_truncated: usize,
    /// Final column widths (mm).
    pub widths: Vec<f64>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecPdfReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}
