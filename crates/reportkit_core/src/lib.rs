//! `reportkit_core` v1:
//! Shared data model and layout kernel for tabular report rendering.
//!
//! Architecture:
//! - `conf`    : constants and default presets
//! - `spec`    : specs/models/options
//! - `util`    : pure helper functions
//! - `format`  : per-column value formatting
//! - `infer`   : column inference from a label map
//! - `metrics` : text measurement backends
//! - `layout`  : column width planning
//! - `options` : boundary options preparation
//! - `frame`   : polars record adapter
//! - `export`  : render-call result envelope
pub mod conf;
pub mod error;
pub mod export;
pub mod format;
pub mod frame;
pub mod infer;
pub mod layout;
pub mod metrics;
pub mod options;
pub mod spec;
pub mod util;

pub use error::{ReportError, ReportResult};
pub use export::run_export;
pub use format::{derive_typed_value, format_long_timestamp, format_value};
pub use frame::{derive_records_from_dataframe, derive_records_from_ipc_bytes};
pub use infer::infer_columns;
pub use layout::{EnumLayoutMode, SpecColumnLayout, SpecLayoutPolicy, plan_column_layout};
pub use metrics::{CharUnitMeasure, EnumFontWeight, HelveticaMeasure, TextMeasure};
pub use options::{SpecReportMeta, prepare_options, prepare_options_at};
pub use spec::{
    EnumCellValue, EnumColumnAlign, EnumColumnFormat, EnumExportKind, Record, SpecArtifact,
    SpecBranding, SpecColumn, SpecCompanyInfo, SpecExportResult, SpecPalette,
    SpecReportMetadata, SpecReportOptions,
};
