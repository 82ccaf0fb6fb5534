//! Workbook normalization against workbooks built in memory.

use std::fs;

use lims_ingest::{IngestError, InstrumentFile, load_catalog, normalize_workbook, transcode};
use lims_model::{SampleCatalog, SourceFormat, WorksheetSelector};
use rust_xlsxwriter::Workbook;

fn results_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let summary = workbook.add_worksheet();
    summary.set_name("Summary").unwrap();
    summary.write_string(0, 0, "Run summary").unwrap();

    let data = workbook.add_worksheet();
    data.set_name("Data").unwrap();
    data.write_string(0, 1, "Sample").unwrap();
    data.write_string(0, 2, "Analyte").unwrap();
    data.write_string(0, 3, "Result").unwrap();
    data.write_string(1, 1, " S1 ").unwrap();
    data.write_string(1, 2, "Fe").unwrap();
    data.write_number(1, 3, 12.5).unwrap();
    // row 2 left blank on purpose
    data.write_string(3, 1, "S2").unwrap();
    data.write_string(3, 2, "Cu\nsecond line").unwrap();
    data.write_number(3, 3, 3.0).unwrap();
    workbook.save_to_buffer().unwrap()
}

#[test]
fn normalizes_named_sheet_with_leading_columns() {
    let bytes = results_workbook();
    let lines = normalize_workbook(
        &bytes,
        SourceFormat::Xlsx,
        &WorksheetSelector::Name("Data".to_string()),
        ',',
    )
    .expect("normalize");
    assert_eq!(
        lines,
        vec![",Sample,Analyte,Result", ",S1,Fe,12.5", ",S2,Cu,3"]
    );
}

#[test]
fn integer_selector_picks_sheet_by_position() {
    let bytes = results_workbook();
    let lines = normalize_workbook(
        &bytes,
        SourceFormat::Xlsx,
        &WorksheetSelector::from("1"),
        '|',
    )
    .expect("normalize");
    assert_eq!(lines[0], "|Sample|Analyte|Result");

    let first = normalize_workbook(&bytes, SourceFormat::Xlsx, &WorksheetSelector::default(), '|')
        .expect("normalize");
    assert_eq!(first, vec!["Run summary"]);
}

#[test]
fn missing_sheet_stops_transcoding() {
    let file = InstrumentFile::new("results.xlsx", results_workbook());
    let error = transcode(
        &file,
        None,
        &WorksheetSelector::Name("NoSuchSheet".to_string()),
        ',',
    )
    .expect_err("missing sheet");
    match error {
        IngestError::SheetNotFound { available, .. } => {
            assert_eq!(available, vec!["Summary".to_string(), "Data".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mislabelled_workbook_falls_back_to_next_reader() {
    let file = InstrumentFile::new("results.xls", results_workbook());
    let lines = transcode(&file, None, &WorksheetSelector::from("Data"), ',').expect("fallback");
    assert_eq!(lines.len(), 3);
}

#[test]
fn reads_files_and_catalogs_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let upload = dir.path().join("run.csv");
    fs::write(&upload, "Sample,Analyte,Result\nS1,Fe,12.5\n").expect("write upload");
    let file = InstrumentFile::from_path(&upload).expect("read upload");
    assert_eq!(file.filename, "run.csv");
    assert_eq!(file.extension_format(), Some(SourceFormat::Csv));

    let catalog_path = dir.path().join("catalog.json");
    fs::write(&catalog_path, r#"{"samples": {"S1": ["Fe", "Cu"]}}"#).expect("write catalog");
    let catalog = load_catalog(&catalog_path).expect("catalog");
    assert_eq!(catalog.analyses("S1"), Some(vec!["Fe".to_string(), "Cu".to_string()]));

    fs::write(&catalog_path, "not json").expect("write catalog");
    assert!(matches!(
        load_catalog(&catalog_path),
        Err(IngestError::Catalog { .. })
    ));
}
