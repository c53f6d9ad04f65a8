//! PDF writer kernel: paginated table with a repeated header band.

use chrono::{DateTime, Datelike, Timelike, Utc};
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use reportkit_core::conf::{C_ATTRIBUTION, C_AUTHOR_DEFAULT, C_LABEL_PAGE, C_LABEL_PAGE_OF};
use reportkit_core::error::{ReportError, ReportResult};
use reportkit_core::export::run_export;
use reportkit_core::format::format_value;
use reportkit_core::layout::{SpecColumnLayout, plan_column_layout};
use reportkit_core::metrics::{
    EnumFontWeight, HelveticaMeasure, encode_winansi, is_winansi_encodable,
};
use reportkit_core::spec::{
    EnumColumnAlign, EnumExportKind, Record, SpecExportResult, SpecPalette, SpecReportOptions,
};
use reportkit_core::util::{derive_unit_rgb, flatten_single_line};

use crate::conf::{
    C_COLOR_BODY_TEXT, C_COLOR_FOOTER_TEXT, C_COLOR_META_TEXT, C_COLOR_ROW_ALT, C_COLOR_RULE,
    C_COLOR_WHITE, C_FONT_BASE_BOLD, C_FONT_BASE_REGULAR, C_FONT_ENCODING, C_FONT_RES_BOLD,
    C_FONT_RES_REGULAR, C_PDF_CREATOR, C_PDF_PRODUCER, N_BASELINE_COMPANY_MM,
    N_BASELINE_CONTACT_MM, N_BASELINE_FOOTER_MM, N_BASELINE_HEADER_OFFSET_MM,
    N_BASELINE_ROW_OFFSET_MM, N_BASELINE_TITLE_MM, N_CELL_PADDING_MM, N_DEFLATE_LEVEL,
    N_FONT_SIZE_COMPANY, N_FONT_SIZE_CONTACT, N_FONT_SIZE_FOOTER, N_FONT_SIZE_META,
    N_FONT_SIZE_SUBTITLE, N_FONT_SIZE_TITLE, N_HEIGHT_BAND_MM, N_HEIGHT_ROW_MM,
    N_HEIGHT_TABLE_HEADER_MM, N_MARGIN_MM, N_PAGE_HEIGHT_MM, N_PAGE_WIDTH_MM, N_STEP_META_MM,
    N_STEP_SUBTITLE_MM, N_STEP_TITLE_MM, N_Y_FOOTER_RULE_MM, derive_width_drawable,
};
use crate::spec::{SpecPdfReport, SpecPdfWriteOptions};
use crate::util::{derive_aligned_x, derive_pt, derive_y_pt, if_row_fits, truncate_to_width};

const N_REF_CATALOG: i32 = 1;
const N_REF_PAGE_TREE: i32 = 2;
const N_REF_FONT_REGULAR: i32 = 3;
const N_REF_FONT_BOLD: i32 = 4;
const N_REF_INFO: i32 = 5;
/// First page object; each page takes two ids (page, content stream).
const N_REF_FIRST_PAGE: i32 = 6;
/// Gap between the footer's left and right texts.
const N_FOOTER_GAP_MM: f64 = 10.0;

/// Render one report into PDF bytes with default writer options.
pub fn write_document(options: &SpecReportOptions) -> ReportResult<(Vec<u8>, SpecPdfReport)> {
    write_document_with(options, &SpecPdfWriteOptions::default())
}

/// Render one report into PDF bytes.
pub fn write_document_with(
    options: &SpecReportOptions,
    write_options: &SpecPdfWriteOptions,
) -> ReportResult<(Vec<u8>, SpecPdfReport)> {
    if options.columns.is_empty() {
        return Err(ReportError::NoColumns);
    }
    let measure =
        HelveticaMeasure::new(write_options.font_size_label, write_options.font_size_body);
    let layout = plan_column_layout(
        &options.columns,
        &options.data,
        &write_options.policy_layout,
        &measure,
    )?;
    let generated_at = options.generated_at();

    let mut composer = DocumentComposer::new(options, write_options, layout);
    composer.draw_banner();
    composer.draw_heading(generated_at);
    composer.draw_table_header();
    for (n_idx_row, record) in options.data.iter().enumerate() {
        composer.draw_row(n_idx_row, record);
    }
    let (l_pages, mut report) = composer.finish();

    if report.n_chars_replaced > 0 {
        tracing::warn!(
            n_chars = report.n_chars_replaced,
            "characters outside WinAnsi drawn as `?`"
        );
        report.inner.warn(format!(
            "{} characters outside the WinAnsi range were drawn as `?`.",
            report.n_chars_replaced
        ));
    }

    let bytes = assemble_pdf(options, write_options, l_pages, generated_at)?;
    tracing::debug!(
        filename = %options.filename,
        n_pages = report.inner.n_pages,
        n_rows = options.data.len(),
        n_cells_truncated = report.inner.n_cells_truncated,
        n_bytes = bytes.len(),
        "wrote document"
    );
    Ok((bytes, report.inner))
}

/// Render the document artifact; failures become a failed result.
pub fn render_document(options: &SpecReportOptions) -> SpecExportResult {
    run_export(EnumExportKind::Document, &options.filename, || {
        write_document(options).map(|(bytes, _report)| bytes)
    })
}

////////////////////////////////////////////////////////////////////////////////
// #region Composer

struct SpecComposerReport {
    inner: SpecPdfReport,
    n_chars_replaced: usize,
}

/// Lays out pages top-down; footers are added once the page count is known.
struct DocumentComposer<'a> {
    options: &'a SpecReportOptions,
    write_options: &'a SpecPdfWriteOptions,
    layout: SpecColumnLayout,
    palette: SpecPalette,
    content: Content,
    l_pages: Vec<Content>,
    report: SpecComposerReport,
    cursor: f64,
}

impl<'a> DocumentComposer<'a> {
    fn new(
        options: &'a SpecReportOptions,
        write_options: &'a SpecPdfWriteOptions,
        layout: SpecColumnLayout,
    ) -> Self {
        let report = SpecComposerReport {
            inner: SpecPdfReport {
                n_pages: 1,
                rows_by_page: vec![0],
                widths: layout.widths.clone(),
                ..Default::default()
            },
            n_chars_replaced: 0,
        };
        Self {
            options,
            write_options,
            layout,
            palette: options.palette(),
            content: Content::new(),
            l_pages: Vec::new(),
            report,
            cursor: 0.0,
        }
    }

    fn draw_banner(&mut self) {
        fill_rect(
            &mut self.content,
            0.0,
            0.0,
            N_PAGE_WIDTH_MM,
            N_HEIGHT_BAND_MM,
            &self.palette.primary,
        );
        let options = self.options;
        let Some(company) = &options.company_info else {
            return;
        };
        let n_width_max = derive_width_drawable();
        self.draw_text_fitted(
            &company.name,
            N_BASELINE_COMPANY_MM,
            EnumFontWeight::Bold,
            N_FONT_SIZE_COMPANY,
            C_COLOR_WHITE,
            n_width_max,
            None,
        );
        if let Some(c_contact) = company.contact_line() {
            self.draw_text_fitted(
                &c_contact,
                N_BASELINE_CONTACT_MM,
                EnumFontWeight::Regular,
                N_FONT_SIZE_CONTACT,
                C_COLOR_WHITE,
                n_width_max,
                None,
            );
        }
    }

    fn draw_heading(&mut self, generated_at: DateTime<Utc>) {
        let options = self.options;
        let n_width_max = derive_width_drawable();
        let c_primary = self.palette.primary.clone();
        self.cursor = N_BASELINE_TITLE_MM;
        self.draw_text_fitted(
            &options.title,
            self.cursor,
            EnumFontWeight::Bold,
            N_FONT_SIZE_TITLE,
            &c_primary,
            n_width_max,
            Some(EnumColumnAlign::Center),
        );
        self.cursor += N_STEP_TITLE_MM;

        if let Some(c_subtitle) = options.subtitle.as_deref().map(str::trim) {
            if !c_subtitle.is_empty() {
                self.draw_text_fitted(
                    c_subtitle,
                    self.cursor,
                    EnumFontWeight::Regular,
                    N_FONT_SIZE_SUBTITLE,
                    C_COLOR_META_TEXT,
                    n_width_max,
                    Some(EnumColumnAlign::Center),
                );
                self.cursor += N_STEP_SUBTITLE_MM;
            }
        }

        self.draw_text_fitted(
            &options.metadata_line(generated_at),
            self.cursor,
            EnumFontWeight::Regular,
            N_FONT_SIZE_META,
            C_COLOR_META_TEXT,
            n_width_max,
            Some(EnumColumnAlign::Center),
        );
        self.cursor += N_STEP_META_MM;
    }

    fn draw_table_header(&mut self) {
        let n_top = self.cursor;
        fill_rect(
            &mut self.content,
            N_MARGIN_MM,
            n_top,
            self.layout.width_total(),
            N_HEIGHT_TABLE_HEADER_MM,
            &self.palette.primary,
        );
        let options = self.options;
        let n_font_size = self.write_options.font_size_label;
        for (n_idx_col, column) in options.columns.iter().enumerate() {
            let (c_text, _if_cut) =
                self.fit_cell_text(&column.label, n_idx_col, EnumFontWeight::Bold, n_font_size);
            self.draw_cell_text(
                &c_text,
                n_idx_col,
                column.align,
                n_top + N_BASELINE_HEADER_OFFSET_MM,
                EnumFontWeight::Bold,
                n_font_size,
                C_COLOR_WHITE,
            );
        }
        self.cursor += N_HEIGHT_TABLE_HEADER_MM;
        self.report.inner.n_header_bands += 1;
    }

    fn draw_row(&mut self, n_idx_row: usize, record: &Record) {
        if !if_row_fits(self.cursor) {
            self.start_continuation_page();
        }
        let n_top = self.cursor;
        if n_idx_row % 2 == 0 {
            fill_rect(
                &mut self.content,
                N_MARGIN_MM,
                n_top,
                self.layout.width_total(),
                N_HEIGHT_ROW_MM,
                C_COLOR_ROW_ALT,
            );
        }
        let options = self.options;
        let n_font_size = self.write_options.font_size_body;
        for (n_idx_col, column) in options.columns.iter().enumerate() {
            let c_raw = flatten_single_line(&format_value(column.value_of(record), column.format));
            let (c_text, if_cut) =
                self.fit_cell_text(&c_raw, n_idx_col, EnumFontWeight::Regular, n_font_size);
            if if_cut {
                self.report.inner.n_cells_truncated += 1;
            }
            self.draw_cell_text(
                &c_text,
                n_idx_col,
                column.align,
                n_top + N_BASELINE_ROW_OFFSET_MM,
                EnumFontWeight::Regular,
                n_font_size,
                C_COLOR_BODY_TEXT,
            );
        }
        self.cursor += N_HEIGHT_ROW_MM;
        if let Some(n_rows) = self.report.inner.rows_by_page.last_mut() {
            *n_rows += 1;
        }
    }

    fn start_continuation_page(&mut self) {
        let content = std::mem::replace(&mut self.content, Content::new());
        self.l_pages.push(content);
        self.report.inner.n_pages += 1;
        self.report.inner.rows_by_page.push(0);
        self.cursor = N_MARGIN_MM;
        self.draw_table_header();
    }

    /// Close the last page and stamp `Página i de N` footers on every page.
    fn finish(mut self) -> (Vec<Content>, SpecComposerReport) {
        self.l_pages.push(self.content);
        let n_pages = self.l_pages.len();
        let c_left = format!("{C_ATTRIBUTION} - {}", flatten_single_line(&self.options.title));
        for (n_idx_page, content) in self.l_pages.iter_mut().enumerate() {
            self.report.n_chars_replaced += draw_footer(content, &c_left, n_idx_page + 1, n_pages);
        }
        (self.l_pages, self.report)
    }

    fn fit_cell_text(
        &self,
        text: &str,
        n_idx_col: usize,
        weight: EnumFontWeight,
        font_size: f64,
    ) -> (String, bool) {
        let n_width_max = self.layout.widths[n_idx_col] - N_CELL_PADDING_MM;
        truncate_to_width(text, n_width_max, |val| {
            HelveticaMeasure::measure_mm(val, weight, font_size)
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_cell_text(
        &mut self,
        text: &str,
        n_idx_col: usize,
        align: EnumColumnAlign,
        baseline: f64,
        weight: EnumFontWeight,
        font_size: f64,
        color: &str,
    ) {
        if text.is_empty() {
            return;
        }
        let n_x = derive_aligned_x(
            N_MARGIN_MM + self.layout.offsets[n_idx_col],
            self.layout.widths[n_idx_col],
            HelveticaMeasure::measure_mm(text, weight, font_size),
            N_CELL_PADDING_MM / 2.0,
            align,
        );
        self.report.n_chars_replaced +=
            draw_text(&mut self.content, text, n_x, baseline, weight, font_size, color);
    }

    /// Single-line text across the drawable width; left-aligned unless `align`.
    #[allow(clippy::too_many_arguments)]
    fn draw_text_fitted(
        &mut self,
        text: &str,
        baseline: f64,
        weight: EnumFontWeight,
        font_size: f64,
        color: &str,
        width_max: f64,
        align: Option<EnumColumnAlign>,
    ) {
        let c_flat = flatten_single_line(text);
        let measure = |val: &str| HelveticaMeasure::measure_mm(val, weight, font_size);
        let (c_text, _if_cut) = truncate_to_width(&c_flat, width_max, measure);
        if c_text.is_empty() {
            return;
        }
        let n_x = match align {
            Some(EnumColumnAlign::Center) => (N_PAGE_WIDTH_MM - measure(&c_text)) / 2.0,
            Some(EnumColumnAlign::Right) => N_PAGE_WIDTH_MM - N_MARGIN_MM - measure(&c_text),
            Some(EnumColumnAlign::Left) | None => N_MARGIN_MM,
        };
        self.report.n_chars_replaced +=
            draw_text(&mut self.content, &c_text, n_x, baseline, weight, font_size, color);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Drawing

/// Fill a rectangle given in top-left millimetre coordinates.
fn fill_rect(content: &mut Content, x: f64, top: f64, width: f64, height: f64, color: &str) {
    let (r, g, b) = derive_unit_rgb(color);
    content.save_state();
    content.set_fill_rgb(r, g, b);
    content.rect(
        derive_pt(x),
        derive_y_pt(top + height),
        derive_pt(width),
        derive_pt(height),
    );
    content.fill_nonzero();
    content.restore_state();
}

/// Draw one text run; returns how many characters fell outside WinAnsi.
fn draw_text(
    content: &mut Content,
    text: &str,
    x: f64,
    baseline: f64,
    weight: EnumFontWeight,
    font_size: f64,
    color: &str,
) -> usize {
    let (r, g, b) = derive_unit_rgb(color);
    let font = match weight {
        EnumFontWeight::Regular => Name(C_FONT_RES_REGULAR),
        EnumFontWeight::Bold => Name(C_FONT_RES_BOLD),
    };
    let bytes = encode_winansi(text);
    content.begin_text();
    content.set_fill_rgb(r, g, b);
    content.set_font(font, font_size as f32);
    content.next_line(derive_pt(x), derive_y_pt(baseline));
    content.show(Str(&bytes));
    content.end_text();
    text.chars().filter(|chr| !is_winansi_encodable(*chr)).count()
}

fn draw_footer(content: &mut Content, text_left: &str, n_page: usize, n_pages: usize) -> usize {
    let (r, g, b) = derive_unit_rgb(C_COLOR_RULE);
    content.save_state();
    content.set_stroke_rgb(r, g, b);
    content.set_line_width(0.5);
    content.move_to(derive_pt(N_MARGIN_MM), derive_y_pt(N_Y_FOOTER_RULE_MM));
    content.line_to(
        derive_pt(N_PAGE_WIDTH_MM - N_MARGIN_MM),
        derive_y_pt(N_Y_FOOTER_RULE_MM),
    );
    content.stroke();
    content.restore_state();

    let measure =
        |val: &str| HelveticaMeasure::measure_mm(val, EnumFontWeight::Regular, N_FONT_SIZE_FOOTER);
    let c_right = format!("{C_LABEL_PAGE} {n_page} {C_LABEL_PAGE_OF} {n_pages}");
    let n_width_right = measure(&c_right);
    let n_width_left = derive_width_drawable() - n_width_right - N_FOOTER_GAP_MM;
    let (c_left, _if_cut) = truncate_to_width(text_left, n_width_left, measure);

    let mut n_chars_replaced = 0;
    if !c_left.is_empty() {
        n_chars_replaced += draw_text(
            content,
            &c_left,
            N_MARGIN_MM,
            N_BASELINE_FOOTER_MM,
            EnumFontWeight::Regular,
            N_FONT_SIZE_FOOTER,
            C_COLOR_FOOTER_TEXT,
        );
    }
    n_chars_replaced += draw_text(
        content,
        &c_right,
        N_PAGE_WIDTH_MM - N_MARGIN_MM - n_width_right,
        N_BASELINE_FOOTER_MM,
        EnumFontWeight::Regular,
        N_FONT_SIZE_FOOTER,
        C_COLOR_FOOTER_TEXT,
    );
    n_chars_replaced
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Assembly

fn assemble_pdf(
    options: &SpecReportOptions,
    write_options: &SpecPdfWriteOptions,
    l_pages: Vec<Content>,
    generated_at: DateTime<Utc>,
) -> ReportResult<Vec<u8>> {
    let n_pages = i32::try_from(l_pages.len())
        .map_err(|_| ReportError::IndexOverflow(format!("page count {}", l_pages.len())))?;
    let n_ref_last = n_pages
        .checked_mul(2)
        .and_then(|val| val.checked_add(N_REF_FIRST_PAGE))
        .ok_or_else(|| ReportError::IndexOverflow(format!("page count {n_pages}")))?;
    let date = derive_pdf_date(generated_at)?;

    let mut pdf = Pdf::new();
    let id_catalog = Ref::new(N_REF_CATALOG);
    let id_page_tree = Ref::new(N_REF_PAGE_TREE);
    let id_font_regular = Ref::new(N_REF_FONT_REGULAR);
    let id_font_bold = Ref::new(N_REF_FONT_BOLD);
    let l_ids_page: Vec<Ref> = (N_REF_FIRST_PAGE..n_ref_last).step_by(2).map(Ref::new).collect();

    pdf.catalog(id_catalog).pages(id_page_tree);
    pdf.pages(id_page_tree)
        .kids(l_ids_page.iter().copied())
        .count(n_pages);
    pdf.type1_font(id_font_regular)
        .base_font(Name(C_FONT_BASE_REGULAR))
        .encoding_predefined(Name(C_FONT_ENCODING));
    pdf.type1_font(id_font_bold)
        .base_font(Name(C_FONT_BASE_BOLD))
        .encoding_predefined(Name(C_FONT_ENCODING));

    let rect_media = Rect::new(
        0.0,
        0.0,
        derive_pt(N_PAGE_WIDTH_MM),
        derive_pt(N_PAGE_HEIGHT_MM),
    );
    for (id_page, content) in l_ids_page.iter().copied().zip(l_pages) {
        let id_content = Ref::new(id_page.get() + 1);
        let mut page = pdf.page(id_page);
        page.media_box(rect_media)
            .parent(id_page_tree)
            .contents(id_content);
        page.resources()
            .fonts()
            .pair(Name(C_FONT_RES_REGULAR), id_font_regular)
            .pair(Name(C_FONT_RES_BOLD), id_font_bold);
        page.finish();

        let data = content.finish();
        if write_options.if_compress_streams {
            let data_compressed = compress_to_vec_zlib(data.as_slice(), N_DEFLATE_LEVEL);
            pdf.stream(id_content, &data_compressed)
                .filter(Filter::FlateDecode);
        } else {
            pdf.stream(id_content, data.as_slice());
        }
    }

    let metadata = options.metadata.clone().unwrap_or_default();
    let c_keywords = metadata.keywords.join(", ");
    let mut info = pdf.document_info(Ref::new(N_REF_INFO));
    info.title(TextStr(&options.title))
        .author(TextStr(metadata.author.as_deref().unwrap_or(C_AUTHOR_DEFAULT)))
        .subject(TextStr(metadata.subject.as_deref().unwrap_or(&options.title)))
        .creator(TextStr(C_PDF_CREATOR))
        .producer(TextStr(C_PDF_PRODUCER))
        .creation_date(date)
        .modified_date(date);
    if !c_keywords.is_empty() {
        info.keywords(TextStr(&c_keywords));
    }
    info.finish();

    Ok(pdf.finish())
}

fn derive_pdf_date(generated_at: DateTime<Utc>) -> ReportResult<Date> {
    let n_year = u16::try_from(generated_at.year())
        .map_err(|_| ReportError::Pdf(format!("year out of range: {}", generated_at.year())))?;
    // chrono guarantees the remaining fields fit in u8.
    Ok(Date::new(n_year)
        .month(generated_at.month() as u8)
        .day(generated_at.day() as u8)
        .hour(generated_at.hour() as u8)
        .minute(generated_at.minute() as u8)
        .second(generated_at.second() as u8)
        .utc_offset_hour(0))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
