//! `reportkit_io_pdf` v1:
//! Paginated document renderer kernel.
//!
//! Architecture:
//! - `conf`   : page geometry, typography and default presets
//! - `spec`   : specs/models/options
//! - `util`   : pure helper functions (units, truncation, alignment)
//! - `writer` : pure-Rust writer kernel
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_CELL_PADDING_MM, N_FOOTER_RESERVE_MM, N_HEIGHT_BAND_MM, N_HEIGHT_ROW_MM,
    N_HEIGHT_TABLE_HEADER_MM, N_MARGIN_MM, N_PAGE_HEIGHT_MM, N_PAGE_WIDTH_MM,
};
pub use spec::{SpecPdfReport, SpecPdfWriteOptions};
pub use util::{derive_row_capacity, truncate_to_width};
pub use writer::{render_document, write_document, write_document_with};
