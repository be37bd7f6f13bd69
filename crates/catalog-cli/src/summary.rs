use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use catalog_model::RunDiagnostics;

use crate::types::RunResult;

/// Example record identifiers shown per row.
const MAX_EXAMPLES: usize = 5;

pub fn print_summary(result: &RunResult) {
    if !result.collection_id.is_empty() {
        println!("Collection: {}", result.collection_id);
    }
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.artifacts.table {
        println!("Encoded table: {}", path.display());
    }
    for path in &result.artifacts.reports {
        println!("Report: {}", path.display());
    }

    let diagnostics = &result.diagnostics;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Result")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    if let Some(schema) = result.schema {
        table.add_row(vec![Cell::new("Schema"), Cell::new(format!("{schema:?}"))]);
    }
    table.add_row(vec![Cell::new("Records"), Cell::new(result.records)]);
    table.add_row(vec![
        Cell::new("Hierarchy entries"),
        Cell::new(diagnostics.hierarchy.len()),
    ]);
    if let Some(defaults) = result.defaults {
        table.add_row(vec![
            Cell::new("Titles cleaned"),
            dim_or_value(defaults.titles_cleaned, Color::Reset),
        ]);
        table.add_row(vec![
            Cell::new("Access restriction defaulted"),
            dim_or_value(defaults.access_filled, Color::Reset),
        ]);
    }
    table.add_row(vec![
        Cell::new("Date issues"),
        dim_or_value(diagnostics.dates.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Roles corrected"),
        dim_or_value(diagnostics.role_corrections.len(), Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Roles unresolved"),
        dim_or_value(diagnostics.roles.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Terms corrected"),
        dim_or_value(
            diagnostics.vocabulary.len() - diagnostics.unresolved_terms(),
            Color::Green,
        ),
    ]);
    table.add_row(vec![
        Cell::new("Terms unresolved"),
        dim_or_value(diagnostics.unresolved_terms(), Color::Yellow),
    ]);
    table.add_row(vec![Cell::new("Output columns"), Cell::new(result.columns)]);
    println!("{table}");

    print_issue_table(diagnostics);
    if let Some(failure) = &result.failure {
        eprintln!("Error: {failure}");
    }
}

fn print_issue_table(diagnostics: &RunDiagnostics) {
    let mut rows: Vec<(String, String, Vec<String>, String)> = Vec::new();
    for discrepancy in &diagnostics.roles.discrepancies {
        let best = discrepancy
            .candidates
            .first()
            .map_or_else(|| "-".to_string(), |c| c.term.clone());
        rows.push((
            "role".to_string(),
            discrepancy.role.clone(),
            discrepancy.unit_ids.clone(),
            best,
        ));
    }
    for issue in diagnostics.vocabulary.iter().filter(|i| !i.is_resolved()) {
        let best = issue
            .suggestion
            .as_ref()
            .map_or_else(|| "-".to_string(), |c| c.term.clone());
        rows.push((
            issue.field.to_string(),
            issue.value.clone(),
            issue.unit_ids.clone(),
            best,
        ));
    }
    if rows.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Records"),
        header_cell("Closest term"),
        header_cell("Examples"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (field, value, unit_ids, best) in rows {
        let examples: Vec<&str> = unit_ids
            .iter()
            .take(MAX_EXAMPLES)
            .map(String::as_str)
            .collect();
        table.add_row(vec![
            Cell::new(field).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(value),
            Cell::new(unit_ids.len()).fg(Color::Yellow),
            if best == "-" { dim_cell(best) } else { Cell::new(best) },
            Cell::new(examples.join(", ")),
        ]);
    }
    println!();
    println!("Unresolved values:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_or_value(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
