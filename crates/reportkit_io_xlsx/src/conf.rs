//! XLSX constants and default preset factories.

use std::collections::BTreeMap;

use reportkit_core::spec::SpecPalette;

use crate::spec::{SpecCellFormat, SpecXlsxWriteOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Excel cell text maximum length, in characters.
pub const N_LEN_EXCEL_CELL_TEXT_MAX: usize = 32_767;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Fallback sheet name when the title sanitizes to nothing.
pub const C_SHEET_NAME_DEFAULT: &str = "Reporte";

pub const C_FONT_NAME_DEFAULT: &str = "Calibri";

pub const C_COLOR_WHITE: &str = "#FFFFFF";
pub const C_COLOR_BANNER_FILL: &str = "#F2F2F2";
pub const C_COLOR_ROW_ALT: &str = "#F2F2F2";
pub const C_COLOR_BORDER: &str = "#D9D9D9";
pub const C_COLOR_BODY_FONT: &str = "#404040";
pub const C_COLOR_MUTED_FONT: &str = "#595959";
pub const C_COLOR_FOOTER_FONT: &str = "#808080";

/// Company banner row height (pt).
pub const N_HEIGHT_ROW_BANNER: f64 = 28.0;
/// Table header row height (pt).
pub const N_HEIGHT_ROW_HEADER: f64 = 24.0;

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumFmtKey {
    /// Company name banner.
    Banner,
    /// Company contact line.
    Contact,
    /// Report title.
    Title,
    /// Report subtitle.
    Subtitle,
    /// Generated-at / record count line.
    Meta,
    /// Table header cells.
    Header,
    /// Data cells (even rows; odd rows add the alternate fill).
    Body,
    /// Summary footer.
    Footer,
}

/// Build default format presets for one report palette.
pub fn derive_default_xlsx_formats(
    palette: &SpecPalette,
    font_name: &str,
) -> BTreeMap<EnumFmtKey, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some(font_name.to_string()),
        font_size: Some(11),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };
    let cfg_section_fmt_spec = cfg_base_fmt_spec.with_(SpecCellFormat {
        align: Some("center".to_string()),
        ..Default::default()
    });

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert(
        EnumFmtKey::Banner,
        cfg_section_fmt_spec.with_(SpecCellFormat {
            font_size: Some(16),
            bold: Some(true),
            font_color: Some(palette.primary.clone()),
            bg_color: Some(C_COLOR_BANNER_FILL.to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Contact,
        cfg_section_fmt_spec.with_(SpecCellFormat {
            font_size: Some(9),
            font_color: Some(C_COLOR_MUTED_FONT.to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Title,
        cfg_section_fmt_spec.with_(SpecCellFormat {
            font_size: Some(14),
            bold: Some(true),
            font_color: Some(palette.primary.clone()),
            bg_color: Some(palette.header.clone()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Subtitle,
        cfg_section_fmt_spec.with_(SpecCellFormat {
            italic: Some(true),
            font_color: Some(palette.secondary.clone()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Meta,
        cfg_section_fmt_spec.with_(SpecCellFormat {
            font_size: Some(9),
            font_color: Some(C_COLOR_MUTED_FONT.to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Header,
        cfg_section_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            font_color: Some(C_COLOR_WHITE.to_string()),
            bg_color: Some(palette.primary.clone()),
            border: Some(1),
            text_wrap: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Body,
        cfg_base_fmt_spec.with_(SpecCellFormat {
            font_size: Some(9),
            font_color: Some(C_COLOR_BODY_FONT.to_string()),
            bg_color: Some(C_COLOR_WHITE.to_string()),
            border: Some(1),
            border_color: Some(C_COLOR_BORDER.to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Footer,
        cfg_section_fmt_spec.with_(SpecCellFormat {
            font_size: Some(8),
            italic: Some(true),
            font_color: Some(C_COLOR_FOOTER_FONT.to_string()),
            ..Default::default()
        }),
    );

    dict_fmt
}

/// Build default write options.
pub fn derive_default_xlsx_write_options() -> SpecXlsxWriteOptions {
    SpecXlsxWriteOptions::default()
}
