//! `reportkit_io_xlsx` v1:
//! Styled spreadsheet renderer kernel.
//!
//! Architecture:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options
//! - `util`   : pure helper functions
//! - `writer` : pure-Rust writer kernel
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    EnumFmtKey, N_LEN_EXCEL_CELL_TEXT_MAX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
pub use spec::{SpecCellFormat, SpecSheetRowPlan, SpecXlsxReport, SpecXlsxWriteOptions};
pub use util::{derive_clamped_cell_text, plan_sheet_rows, sanitize_sheet_name};
pub use writer::{XlsxWriter, render_spreadsheet, write_spreadsheet, write_spreadsheet_with};
