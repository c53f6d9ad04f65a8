//! Report constants and default preset factories.

use crate::layout::{EnumLayoutMode, SpecLayoutPolicy};
use crate::spec::{SpecBranding, SpecCompanyInfo};

////////////////////////////////////////////////////////////////////////////////
// #region Locale

/// Display pattern for parsed dates (`DD/MM/YYYY`).
pub const C_DATE_DISPLAY_PATTERN: &str = "%d/%m/%Y";
/// Long timestamp pattern used in report metadata lines.
pub const C_TIMESTAMP_LONG_PATTERN: &str = "%e de %B de %Y, %H:%M UTC";
/// Thousands separator of the fixed locale.
pub const C_THOUSANDS_SEPARATOR: char = ',';
/// Decimal separator of the fixed locale.
pub const C_DECIMAL_SEPARATOR: char = '.';
/// Currency symbol prefixed to currency values.
pub const C_CURRENCY_SYMBOL: &str = "$";
/// Max fraction digits rendered for plain numbers.
pub const N_NUMBER_FRACTION_DIGITS_MAX: usize = 3;
/// Fixed fraction digits for currency values.
pub const N_CURRENCY_FRACTION_DIGITS: usize = 2;
/// Fixed fraction digits for percentage values.
pub const N_PERCENTAGE_FRACTION_DIGITS: usize = 2;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region NumberFormats

/// Spreadsheet number format for `number` columns.
pub const C_NUM_FORMAT_NUMBER: &str = "#,##0";
/// Spreadsheet number format for `currency` columns.
pub const C_NUM_FORMAT_CURRENCY: &str = "\"$\"#,##0.00";
/// Spreadsheet number format for `percentage` columns.
pub const C_NUM_FORMAT_PERCENTAGE: &str = "0.00%";
/// Spreadsheet number format for `date` columns.
pub const C_NUM_FORMAT_DATE: &str = "dd/mm/yyyy";

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnInference

/// Key fragments that mark a date column.
pub const TUP_KEY_TOKENS_DATE: [&str; 2] = ["date", "fecha"];
/// Key fragments that mark a currency column.
pub const TUP_KEY_TOKENS_CURRENCY: [&str; 3] = ["cost", "price", "amount"];
/// Strings longer than this (in chars) get the wide text width hint.
pub const N_LEN_TEXT_LONG: usize = 30;

pub const N_WIDTH_HINT_DATE: f64 = 18.0;
pub const N_WIDTH_HINT_CURRENCY: f64 = 20.0;
pub const N_WIDTH_HINT_NUMBER: f64 = 15.0;
pub const N_WIDTH_HINT_TEXT_LONG: f64 = 25.0;
pub const N_WIDTH_HINT_TEXT: f64 = 15.0;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Layout

/// Spreadsheet width floor, in character-width units.
pub const N_WIDTH_SHEET_MIN: f64 = 12.0;
/// Spreadsheet width cap, in character-width units.
pub const N_WIDTH_SHEET_MAX: f64 = 60.0;
/// Spreadsheet padding added to measured widths.
pub const N_WIDTH_SHEET_PADDING: f64 = 2.0;

/// Document width floor, in millimetres.
pub const N_WIDTH_DOC_MIN_MM: f64 = 25.0;
/// Document padding added to measured widths, in millimetres.
pub const N_WIDTH_DOC_PADDING_MM: f64 = 6.0;

/// Non-ASCII glyph weight for character-unit estimates.
pub const N_WIDTH_NON_ASCII_FACTOR: f64 = 1.6;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Branding

pub const C_COLOR_PRIMARY_DEFAULT: &str = "#1F4E79";
pub const C_COLOR_SECONDARY_DEFAULT: &str = "#2E75B6";
pub const C_COLOR_HEADER_DEFAULT: &str = "#D9D9D9";

pub const C_COMPANY_NAME_DEFAULT: &str = "Sistema de Gestión Empresarial";
pub const C_AUTHOR_DEFAULT: &str = "Sistema";
pub const C_CATEGORY_DEFAULT: &str = "Reportes";
pub const C_KEYWORD_DEFAULT: &str = "reporte";
/// Attribution string printed in summary footers.
pub const C_ATTRIBUTION: &str = "Generado por Sistema de Reportes";

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Messages

pub const C_MSG_EXPORT_SUCCESS: &str = "Archivo {kind} generado exitosamente";
pub const C_MSG_EXPORT_FAILURE: &str = "Error al exportar {kind}: {details}";
pub const C_LABEL_RECORD_COUNT: &str = "Total de registros";
pub const C_LABEL_GENERATED: &str = "Generado el";
pub const C_LABEL_DEPARTMENT: &str = "Departamento";
pub const C_LABEL_PAGE: &str = "Página";
pub const C_LABEL_PAGE_OF: &str = "de";

// #endregion
////////////////////////////////////////////////////////////////////////////////

/// Build the default company banner used by `prepare_options`.
pub fn derive_default_company_info() -> SpecCompanyInfo {
    SpecCompanyInfo {
        name: C_COMPANY_NAME_DEFAULT.to_string(),
        ..Default::default()
    }
}

/// Build the default branding palette.
pub fn derive_default_branding() -> SpecBranding {
    SpecBranding {
        primary_color: Some(C_COLOR_PRIMARY_DEFAULT.to_string()),
        secondary_color: Some(C_COLOR_SECONDARY_DEFAULT.to_string()),
        header_color: Some(C_COLOR_HEADER_DEFAULT.to_string()),
    }
}

/// Build the spreadsheet (unconstrained) layout policy.
pub fn derive_default_sheet_layout_policy() -> SpecLayoutPolicy {
    SpecLayoutPolicy {
        rule_mode: EnumLayoutMode::Unconstrained,
        width_min: N_WIDTH_SHEET_MIN,
        width_max: N_WIDTH_SHEET_MAX,
        width_padding: N_WIDTH_SHEET_PADDING,
        width_available: 0.0,
        height_body_inferred_max: None,
    }
}

/// Build the document (fit-to-width) layout policy for `width_available` mm.
pub fn derive_default_document_layout_policy(width_available: f64) -> SpecLayoutPolicy {
    SpecLayoutPolicy {
        rule_mode: EnumLayoutMode::FitToWidth,
        width_min: N_WIDTH_DOC_MIN_MM,
        width_max: f64::INFINITY,
        width_padding: N_WIDTH_DOC_PADDING_MM,
        width_available,
        height_body_inferred_max: None,
    }
}
