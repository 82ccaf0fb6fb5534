//! Snapshot tests for the worklist exporters.

use chrono::NaiveDate;
use lims_model::{Worklist, WorklistEntry};
use lims_report::{
    CSV_CONTENT_TYPE, ExportDocument, ExportOptions, ExporterRegistry, WorklistExporter,
    XML_CONTENT_TYPE,
};

fn entry(analysis_id: &str, title: &str, sample_id: &str, container: Option<&str>, position: u32) -> WorklistEntry {
    WorklistEntry {
        analysis_id: analysis_id.to_string(),
        analysis_title: title.to_string(),
        sample_id: sample_id.to_string(),
        container_id: container.map(String::from),
        position,
    }
}

fn worklist() -> Worklist {
    let mut worklist = Worklist::new("WS-0007");
    worklist.instrument_title = "Agilent 7890 GC".to_string();
    worklist.data_interface = "agilent.chemstation".to_string();
    worklist.entries = vec![
        entry("a1", "SO2 free", "S-2", Some("C-2"), 2),
        entry("a2", "SO2 total", "S-2", Some("C-2"), 2),
        entry("a3", "SO2 free", "S-1", Some("C-1"), 1),
        entry("a4", "Ethanol", "S-3", None, 2),
    ];
    worklist
}

fn options() -> ExportOptions {
    let generated_at = NaiveDate::from_ymd_opt(2024, 6, 3)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .unwrap();
    ExportOptions::new(generated_at)
}

fn export(id: &str, worklist: &Worklist) -> ExportDocument {
    ExporterRegistry::default()
        .get(id)
        .unwrap()
        .export(worklist, &options())
        .unwrap()
}

#[test]
fn chemstation_sequence_list() {
    let document = export("agilent.chemstation", &worklist());
    assert_eq!(document.filename, "WS-0007-agilent-chemstation.csv");
    assert_eq!(document.content_type, CSV_CONTENT_TYPE);
    assert!(document.text().contains("\r\n"));
    insta::assert_snapshot!(document.text().replace("\r\n", "\n").trim_end(), @r"
    WS-0007_agilent-7890-gc_20240603-0930;F SO2 & T SO2
    1;1;S-1;C-1;1;
    1;2;S-2;C-2;1;
    1;2;S-3;;1;
    ");
}

#[test]
fn chemstation_uses_configured_options() {
    let mut worklist = worklist();
    worklist.options.insert("dilute_factor".to_string(), "10".to_string());
    worklist.options.insert("method".to_string(), " ".to_string());
    let document = export("agilent.chemstation", &worklist);
    let text = document.text();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("WS-0007_agilent-7890-gc_20240603-0930;F SO2 & T SO2"));
    assert_eq!(lines.next(), Some("1;1;S-1;C-1;10;"));
}

#[test]
fn maldi_target_plate() {
    let document = export("maldibiotyper", &worklist());
    assert_eq!(document.filename, "WS-0007-maldi-biotyper.in.csv");
    insta::assert_snapshot!(document.text().replace("\r\n", "\n").trim_end(), @r"
    A1;S-1;SO2 free
    A2;S-2;SO2 free
    A2;S-3;Ethanol
    ");
}

#[test]
fn masshunter_sequence_table() {
    let mut worklist = worklist();
    worklist.options.insert("dilute_factor".to_string(), "2".to_string());
    worklist.options.insert("method".to_string(), "GC-FID ethanol".to_string());
    let document = export("agilent.masshunter.sequence", &worklist);
    assert_eq!(document.filename, "WS-0007-agilent-7890-gc.xml");
    assert_eq!(document.content_type, XML_CONTENT_TYPE);
    insta::assert_snapshot!(document.text(), @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <SequenceTable WorklistId="WS-0007" Instrument="Agilent 7890 GC" Created="2024-06-03T09:30:00">
      <Sample Slot="1">
        <SampleId>S-1</SampleId>
        <Container>C-1</Container>
        <Dilution>2</Dilution>
        <Method>GC-FID ethanol</Method>
        <Analyses>
          <Analysis Id="a3">SO2 free</Analysis>
        </Analyses>
      </Sample>
      <Sample Slot="2">
        <SampleId>S-2</SampleId>
        <Container>C-2</Container>
        <Dilution>2</Dilution>
        <Method>GC-FID ethanol</Method>
        <Analyses>
          <Analysis Id="a1">SO2 free</Analysis>
          <Analysis Id="a2">SO2 total</Analysis>
        </Analyses>
      </Sample>
      <Sample Slot="2">
        <SampleId>S-3</SampleId>
        <Dilution>2</Dilution>
        <Method>GC-FID ethanol</Method>
        <Analyses>
          <Analysis Id="a4">Ethanol</Analysis>
        </Analyses>
      </Sample>
    </SequenceTable>
    "#);
}

#[test]
fn empty_worklist_exports_header_only() {
    let worklist = Worklist::new("WS-0008");
    let document = export("agilent.chemstation", &worklist);
    assert_eq!(document.filename, "WS-0008-.csv");
    assert_eq!(document.text(), "WS-0008__20240603-0930;F SO2 & T SO2\r\n");
}

#[test]
fn document_is_written_under_its_filename() {
    let dir = tempfile::tempdir().unwrap();
    let document = export("maldibiotyper", &worklist());
    let path = document.write_to_dir(&dir.path().join("out")).unwrap();
    assert_eq!(path.file_name().unwrap(), "WS-0007-maldi-biotyper.in.csv");
    assert_eq!(std::fs::read(&path).unwrap(), document.bytes);
}

#[test]
fn registry_titles() {
    let registry = ExporterRegistry::default();
    let titles: Vec<&str> = registry.iter().map(WorklistExporter::title).collect();
    assert_eq!(
        titles,
        vec!["Agilent ChemStation Exporter", "Agilent MassHunter Sequence", "MALDI Biotyper"]
    );
}
