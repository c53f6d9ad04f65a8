//! Boundary entry point that turns raw records into report options.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::conf::{
    C_AUTHOR_DEFAULT, C_CATEGORY_DEFAULT, C_KEYWORD_DEFAULT, derive_default_branding,
    derive_default_company_info,
};
use crate::infer::infer_columns;
use crate::spec::{Record, SpecReportMetadata, SpecReportOptions};
use crate::util::slugify;

/// Caller-facing report description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpecReportMeta {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl SpecReportMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Build options with inferred columns and the default presets, stamped now.
pub fn prepare_options(
    data: Vec<Record>,
    column_label_map: &IndexMap<String, String>,
    report_meta: SpecReportMeta,
) -> SpecReportOptions {
    prepare_options_at(data, column_label_map, report_meta, Utc::now())
}

/// Same as [`prepare_options`] with an explicit clock.
pub fn prepare_options_at(
    data: Vec<Record>,
    column_label_map: &IndexMap<String, String>,
    report_meta: SpecReportMeta,
    now: DateTime<Utc>,
) -> SpecReportOptions {
    let columns = infer_columns(&data, column_label_map);
    let c_slug = slugify(&report_meta.title);
    let filename = format!("{c_slug}_{}", now.format("%Y-%m-%d"));

    let metadata = SpecReportMetadata {
        author: Some(
            report_meta
                .author
                .unwrap_or_else(|| C_AUTHOR_DEFAULT.to_string()),
        ),
        department: report_meta.department,
        subject: Some(report_meta.title.clone()),
        keywords: vec![C_KEYWORD_DEFAULT.to_string(), c_slug],
        category: Some(C_CATEGORY_DEFAULT.to_string()),
        generated_at: Some(now),
    };

    tracing::debug!(
        title = %report_meta.title,
        n_rows = data.len(),
        n_cols = columns.len(),
        %filename,
        "prepared report options"
    );

    SpecReportOptions {
        title: report_meta.title,
        subtitle: report_meta.subtitle,
        filename,
        columns,
        data,
        company_info: Some(derive_default_company_info()),
        metadata: Some(metadata),
        branding: Some(derive_default_branding()),
    }
}
