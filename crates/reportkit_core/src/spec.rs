//! Shared report specification models.

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conf::{
    C_ATTRIBUTION, C_COLOR_HEADER_DEFAULT, C_COLOR_PRIMARY_DEFAULT, C_COLOR_SECONDARY_DEFAULT,
    C_LABEL_DEPARTMENT, C_LABEL_GENERATED, C_LABEL_RECORD_COUNT, C_MSG_EXPORT_FAILURE,
    C_MSG_EXPORT_SUCCESS, C_NUM_FORMAT_CURRENCY, C_NUM_FORMAT_DATE, C_NUM_FORMAT_NUMBER,
    C_NUM_FORMAT_PERCENTAGE,
};
use crate::format::format_long_timestamp;
use crate::util::resolve_hex_color;

/// One input row, keyed by field name. Key order is irrelevant to rendering;
/// columns decide what is read and in which order.
pub type Record = IndexMap<String, Value>;

////////////////////////////////////////////////////////////////////////////////
// #region ColumnSpecification

/// Semantic type of a column, driving value rendering and sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumColumnFormat {
    /// Verbatim text.
    #[default]
    Text,
    /// Grouped number.
    Number,
    /// `$`-prefixed amount with two decimals.
    Currency,
    /// `DD/MM/YYYY` date.
    Date,
    /// Fraction rendered as percent.
    Percentage,
}

impl EnumColumnFormat {
    /// Spreadsheet number format code for this column format, if any.
    pub fn num_format(self) -> Option<&'static str> {
        match self {
            Self::Text => None,
            Self::Number => Some(C_NUM_FORMAT_NUMBER),
            Self::Currency => Some(C_NUM_FORMAT_CURRENCY),
            Self::Date => Some(C_NUM_FORMAT_DATE),
            Self::Percentage => Some(C_NUM_FORMAT_PERCENTAGE),
        }
    }

    /// Alignment used when the caller does not choose one.
    pub fn default_align(self) -> EnumColumnAlign {
        match self {
            Self::Number | Self::Currency => EnumColumnAlign::Right,
            _ => EnumColumnAlign::Left,
        }
    }
}

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumColumnAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Typed column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecColumn {
    /// Record key read by this column.
    pub key: String,
    /// Header text.
    pub label: String,
    /// Preferred width hint in character units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Value format.
    #[serde(default)]
    pub format: EnumColumnFormat,
    /// Cell alignment.
    #[serde(default)]
    pub align: EnumColumnAlign,
}

impl SpecColumn {
    /// Explicit column with the format's default alignment and no width hint.
    pub fn new(key: impl Into<String>, label: impl Into<String>, format: EnumColumnFormat) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            format,
            align: format.default_align(),
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_align(mut self, align: EnumColumnAlign) -> Self {
        self.align = align;
        self
    }

    /// Read this column's raw value from `record`; missing keys read as null.
    pub fn value_of<'a>(&self, record: &'a Record) -> &'a Value {
        record.get(&self.key).unwrap_or(&Value::Null)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BrandingSpecification

/// Static corporate banner text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpecCompanyInfo {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Logo reference kept for callers; renderers do not embed images.
    #[serde(default)]
    pub logo: Option<String>,
}

impl SpecCompanyInfo {
    /// Contact fields joined by `" | "`, or `None` when all are blank.
    pub fn contact_line(&self) -> Option<String> {
        let l_parts: Vec<&str> = [&self.address, &self.phone, &self.email, &self.website]
            .into_iter()
            .filter_map(|val| val.as_deref())
            .map(str::trim)
            .filter(|val| !val.is_empty())
            .collect();
        if l_parts.is_empty() {
            None
        } else {
            Some(l_parts.join(" | "))
        }
    }
}

/// Caller-supplied brand colors (hex strings).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpecBranding {
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub header_color: Option<String>,
}

impl SpecBranding {
    /// Validate every color, falling back to defaults for missing/invalid ones.
    pub fn resolve(&self) -> SpecPalette {
        SpecPalette {
            primary: resolve_hex_color(self.primary_color.as_deref(), C_COLOR_PRIMARY_DEFAULT),
            secondary: resolve_hex_color(
                self.secondary_color.as_deref(),
                C_COLOR_SECONDARY_DEFAULT,
            ),
            header: resolve_hex_color(self.header_color.as_deref(), C_COLOR_HEADER_DEFAULT),
        }
    }
}

/// Validated palette; every entry is `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPalette {
    pub primary: String,
    pub secondary: String,
    pub header: String,
}

impl Default for SpecPalette {
    fn default() -> Self {
        SpecBranding::default().resolve()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportOptions

/// Document metadata stamped into both artifacts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecReportMetadata {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Timestamp printed in the artifacts; `None` means "now".
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Full configuration bundle for one export call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecReportOptions {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Artifact base name, without extension.
    pub filename: String,
    pub columns: Vec<SpecColumn>,
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub company_info: Option<SpecCompanyInfo>,
    #[serde(default)]
    pub metadata: Option<SpecReportMetadata>,
    #[serde(default)]
    pub branding: Option<SpecBranding>,
}

impl SpecReportOptions {
    /// Minimal options: no company banner, metadata or branding overrides.
    pub fn new(
        title: impl Into<String>,
        filename: impl Into<String>,
        columns: Vec<SpecColumn>,
        data: Vec<Record>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            filename: filename.into(),
            columns,
            data,
            company_info: None,
            metadata: None,
            branding: None,
        }
    }

    pub fn palette(&self) -> SpecPalette {
        self.branding.clone().unwrap_or_default().resolve()
    }

    /// Timestamp shown in the artifacts.
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.metadata
            .as_ref()
            .and_then(|meta| meta.generated_at)
            .unwrap_or_else(Utc::now)
    }

    pub fn department(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|meta| meta.department.as_deref())
            .filter(|val| !val.trim().is_empty())
    }

    /// `Generado el <timestamp> | Total de registros: N[ | Departamento: X]`.
    pub fn metadata_line(&self, generated_at: DateTime<Utc>) -> String {
        let mut c_line = format!(
            "{C_LABEL_GENERATED} {} | {C_LABEL_RECORD_COUNT}: {}",
            format_long_timestamp(generated_at),
            self.data.len()
        );
        if let Some(c_department) = self.department() {
            c_line.push_str(&format!(" | {C_LABEL_DEPARTMENT}: {c_department}"));
        }
        c_line
    }

    /// `<title> | Total de registros: N | <attribution>`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {C_LABEL_RECORD_COUNT}: {} | {C_ATTRIBUTION}",
            self.title,
            self.data.len()
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValues

/// Normalized cell value handed to the spreadsheet writer.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Calendar date.
    Date(NaiveDate),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExportResult

/// Output flavor of an export call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumExportKind {
    Spreadsheet,
    Document,
}

impl EnumExportKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Spreadsheet => "xlsx",
            Self::Document => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Document => "application/pdf",
        }
    }

    /// User-facing name used in result messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Spreadsheet => "Excel",
            Self::Document => "PDF",
        }
    }
}

/// Finished in-memory output; delivery is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecArtifact {
    pub filename: String,
    pub kind: EnumExportKind,
    pub bytes: Vec<u8>,
}

impl SpecArtifact {
    /// `{filename}.{ext}`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.filename, self.kind.extension())
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

/// Terminal outcome of one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportResult {
    pub success: bool,
    pub message: String,
    /// Present iff `success`.
    pub artifact: Option<SpecArtifact>,
}

impl SpecExportResult {
    pub fn succeeded(artifact: SpecArtifact) -> Self {
        Self {
            success: true,
            message: C_MSG_EXPORT_SUCCESS.replace("{kind}", artifact.kind.display_name()),
            artifact: Some(artifact),
        }
    }

    pub fn failed(kind: EnumExportKind, details: impl AsRef<str>) -> Self {
        Self {
            success: false,
            message: C_MSG_EXPORT_FAILURE
                .replace("{kind}", kind.display_name())
                .replace("{details}", details.as_ref()),
            artifact: None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
