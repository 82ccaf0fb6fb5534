use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lims_model::{Diagnostic, ImportSummary};

use crate::types::{ExportReport, ImportReport};

pub fn print_import_summary(report: &ImportReport) {
    let outcome = &report.outcome;
    println!("Interface: {}", report.interface);
    println!("File: {}", report.file.display());
    if let Some(path) = &report.output {
        println!("Results: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Samples"),
        header_cell("Analyses"),
        header_cell("Results"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 5, CellAlignment::Center);
    let summary = &outcome.summary;
    table.add_row(vec![
        Cell::new(outcome.raw_results.object_count()),
        Cell::new(outcome.raw_results.analysis_count()),
        Cell::new(outcome.raw_results.result_count()),
        count_cell(summary.errors.len(), Color::Red),
        count_cell(summary.warns.len(), Color::Yellow),
        status_cell(outcome.success),
    ]);
    println!("{table}");
    print_diagnostics(summary);
}

fn print_diagnostics(summary: &ImportSummary) {
    if summary.errors.is_empty() && summary.warns.is_empty() && summary.log.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Line"),
        header_cell("Message"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Right);
    let groups = [
        (&summary.errors, Cell::new("ERROR").fg(Color::Red)),
        (&summary.warns, Cell::new("WARN").fg(Color::Yellow)),
        (&summary.log, dim_cell("LOG")),
    ];
    for (diagnostics, severity) in groups {
        for diagnostic in diagnostics {
            table.add_row(vec![
                severity.clone(),
                line_cell(diagnostic),
                Cell::new(&diagnostic.message),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_export_summary(report: &ExportReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Worklist"),
        header_cell("Exporter"),
        header_cell("Samples"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(&report.worklist_id)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(&report.exporter),
        Cell::new(report.samples),
        Cell::new(report.path.display()),
    ]);
    println!("{table}");
}

pub(crate) fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub(crate) fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn status_cell(success: bool) -> Cell {
    if success {
        Cell::new("OK").fg(Color::Green)
    } else {
        Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn line_cell(diagnostic: &Diagnostic) -> Cell {
    match diagnostic.line_number {
        Some(line) => Cell::new(line),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
