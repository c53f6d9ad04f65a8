use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use chrono::{TimeZone, Utc};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use reportkit_core::options::{SpecReportMeta, prepare_options_at};
use reportkit_core::spec::{
    EnumColumnFormat, Record, SpecColumn, SpecReportMetadata, SpecReportOptions,
};
use reportkit_io_xlsx::{
    N_LEN_EXCEL_CELL_TEXT_MAX, SpecXlsxWriteOptions, XlsxWriter, render_spreadsheet,
    write_spreadsheet,
};
use serde_json::json;

fn open_workbook(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
    open_workbook_from_rs(Cursor::new(bytes)).unwrap()
}

fn cell_text(range: &calamine::Range<Data>, pos: (u32, u32)) -> String {
    match range.get_value(pos) {
        Some(Data::String(val)) => val.clone(),
        other => panic!("expected text at {pos:?}, got {other:?}"),
    }
}

fn derive_inventory_options() -> SpecReportOptions {
    let mut record = Record::new();
    record.insert("name".to_string(), json!("Silla ergonómica"));
    record.insert("qty".to_string(), json!(1250));
    record.insert("unit_price".to_string(), json!(1234.5));
    record.insert("fecha_alta".to_string(), json!("2024-03-05T00:00:00Z"));
    let label_map: IndexMap<String, String> = [
        ("name", "Nombre"),
        ("qty", "Cantidad"),
        ("unit_price", "Precio"),
        ("fecha_alta", "Alta"),
    ]
    .into_iter()
    .map(|(key, label)| (key.to_string(), label.to_string()))
    .collect();
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 9, 15, 0).unwrap();
    prepare_options_at(
        vec![record.clone(), record],
        &label_map,
        SpecReportMeta::new("Inventario General"),
        now,
    )
}

#[test]
fn test_header_only_workbook_when_data_is_empty() {
    let options = SpecReportOptions::new(
        "Tickets",
        "tickets",
        vec![SpecColumn::new("status", "Estado", EnumColumnFormat::Text)],
        Vec::new(),
    );
    let (bytes, report) = write_spreadsheet(&options).unwrap();
    assert_eq!(report.sheet_name, "Tickets");
    assert_eq!(report.n_rows_data, 0);
    assert_eq!(report.row_header, 3);

    let mut workbook = open_workbook(bytes);
    assert_eq!(workbook.sheet_names(), vec!["Tickets".to_string()]);
    let range = workbook.worksheet_range("Tickets").unwrap();
    assert_eq!(cell_text(&range, (0, 0)), "Tickets");
    assert!(cell_text(&range, (1, 0)).ends_with("Total de registros: 0"));
    assert_eq!(cell_text(&range, (3, 0)), "Estado");
    assert_eq!(
        cell_text(&range, (5, 0)),
        "Tickets | Total de registros: 0 | Generado por Sistema de Reportes"
    );
}

#[test]
fn test_oversized_text_is_clamped_to_cell_limit() {
    let mut record = Record::new();
    record.insert("notes".to_string(), json!("a".repeat(40_000)));
    record.insert("code".to_string(), json!("N-1"));
    let mut options = SpecReportOptions::new(
        "Notas",
        "notas",
        vec![
            SpecColumn::new("notes", "Notas", EnumColumnFormat::Text),
            SpecColumn::new("code", "Código", EnumColumnFormat::Text),
        ],
        vec![record],
    );
    options.subtitle = Some("b".repeat(40_000));
    let (bytes, report) = write_spreadsheet(&options).unwrap();
    assert_eq!(report.warnings.len(), 2);

    let mut workbook = open_workbook(bytes);
    let range = workbook.worksheet_range("Notas").unwrap();
    let c_subtitle = cell_text(&range, (1, 0));
    assert_eq!(c_subtitle.chars().count(), N_LEN_EXCEL_CELL_TEXT_MAX);
    assert!(c_subtitle.ends_with("b..."));

    let n_row_first = report.row_header as u32 + 1;
    let c_notes = cell_text(&range, (n_row_first, 0));
    assert_eq!(c_notes.chars().count(), N_LEN_EXCEL_CELL_TEXT_MAX);
    assert!(c_notes.starts_with("aaa"));
    assert!(c_notes.ends_with("a..."));
    assert_eq!(cell_text(&range, (n_row_first, 1)), "N-1");
}

#[test]
fn test_sections_and_typed_cells() {
    let options = derive_inventory_options();
    let (bytes, report) = write_spreadsheet(&options).unwrap();

    // banner, spacer, title, meta, spacer, header
    assert_eq!(report.row_header, 5);
    assert_eq!(report.n_rows_data, 2);

    let mut workbook = open_workbook(bytes);
    let range = workbook.worksheet_range("Inventario General").unwrap();
    assert_eq!(cell_text(&range, (0, 0)), "Sistema de Gestión Empresarial");
    assert_eq!(cell_text(&range, (2, 0)), "Inventario General");
    assert_eq!(
        cell_text(&range, (3, 0)),
        "Generado el 5 de marzo de 2024, 09:15 UTC | Total de registros: 2"
    );
    let l_labels: Vec<String> = (0..4).map(|n_col| cell_text(&range, (5, n_col))).collect();
    assert_eq!(l_labels, vec!["Nombre", "Cantidad", "Precio", "Alta"]);

    assert_eq!(cell_text(&range, (6, 0)), "Silla ergonómica");
    assert_eq!(range.get_value((6, 1)), Some(&Data::Float(1250.0)));
    assert_eq!(range.get_value((6, 2)), Some(&Data::Float(1234.5)));
    match range.get_value((6, 3)) {
        Some(Data::DateTime(datetime)) => assert_eq!(datetime.as_f64(), 45356.0),
        other => panic!("expected a date cell, got {other:?}"),
    }
    assert!(cell_text(&range, (9, 0)).starts_with("Inventario General | Total de registros: 2"));
}

#[test]
fn test_widths_follow_sheet_policy() {
    let mut options = derive_inventory_options();
    options.data[0].insert("name".to_string(), json!("x".repeat(120)));
    let (_bytes, report) = write_spreadsheet(&options).unwrap();
    assert_eq!(report.widths.len(), 4);
    assert_eq!(report.widths[0], 60.0);
    assert!(report.widths.iter().all(|val| (12.0..=60.0).contains(val)));
}

#[test]
fn test_unparsable_dates_are_written_as_text() {
    let mut record = Record::new();
    record.insert("fecha".to_string(), json!("pendiente"));
    let mut options = SpecReportOptions::new(
        "Bajas",
        "bajas",
        vec![SpecColumn::new("fecha", "Fecha", EnumColumnFormat::Date)],
        vec![record],
    );
    options.metadata = Some(SpecReportMetadata {
        generated_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
        ..Default::default()
    });
    let (bytes, report) = write_spreadsheet(&options).unwrap();
    let range = open_workbook(bytes).worksheet_range("Bajas").unwrap();
    assert_eq!(cell_text(&range, (report.row_header as u32 + 1, 0)), "pendiente");
}

#[test]
fn test_writer_deduplicates_sheet_names() {
    let options = SpecReportOptions::new(
        "Ventas: Q1",
        "ventas",
        vec![SpecColumn::new("a", "A", EnumColumnFormat::Text)],
        Vec::new(),
    );
    let mut writer = XlsxWriter::new(SpecXlsxWriteOptions::default());
    writer.write_report_sheet(&options).unwrap();
    writer.write_report_sheet(&options).unwrap();
    let l_reports = writer.report();
    assert_eq!(l_reports[0].sheet_name, "Ventas_ Q1");
    assert_eq!(l_reports[1].sheet_name, "Ventas_ Q1 (2)");
    assert_eq!(l_reports[0].warnings.len(), 1);

    let workbook = open_workbook(writer.save_to_buffer().unwrap());
    assert_eq!(workbook.sheet_names().len(), 2);
}

#[test]
fn test_render_spreadsheet_result() {
    let options = derive_inventory_options();
    let result = render_spreadsheet(&options);
    assert!(result.success);
    assert_eq!(result.message, "Archivo Excel generado exitosamente");
    let artifact = result.artifact.unwrap();
    assert_eq!(artifact.file_name(), "inventario_general_2024-03-05.xlsx");
    assert_eq!(
        artifact.mime_type(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(artifact.bytes.starts_with(b"PK"));

    let empty = SpecReportOptions::new("Vacío", "vacio", Vec::new(), Vec::new());
    let result = render_spreadsheet(&empty);
    assert!(!result.success);
    assert!(result.artifact.is_none());
    assert!(result.message.starts_with("Error al exportar Excel: "));
}
