use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use vsac_cli::types::RunSummary;

pub fn print_summary(summary: &RunSummary) {
    println!("Source: {}", summary.source);
    println!(
        "Export: {} / {}",
        summary.output_format, summary.output_structure
    );
    if summary.from_cache {
        println!("Value sets: loaded from {}", summary.cache_path.display());
    } else {
        println!(
            "Value sets: {} requested, {} retrieved",
            summary.requested, summary.retrieved
        );
    }
    println!("Output: {}", summary.output_dir.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for written in &summary.tables {
        let file = written
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&written.name).add_attribute(Attribute::Bold),
            count_cell(written.rows),
            dim_cell(file),
        ]);
    }
    println!("{table}");

    print_changes(summary);
}

fn print_changes(summary: &RunSummary) {
    if summary.dropped.is_empty() && summary.renamed.is_empty() && summary.new_ids.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Change"),
        header_cell("OID"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    for dropped in &summary.dropped {
        table.add_row(vec![
            Cell::new("skipped").fg(Color::Yellow),
            Cell::new(&dropped.oid),
            Cell::new(format!("{} ({})", dropped.display_name, dropped.reason.as_str())),
        ]);
    }
    for renamed in &summary.renamed {
        table.add_row(vec![
            Cell::new("renamed").fg(Color::Cyan),
            Cell::new(&renamed.oid),
            Cell::new(format!("{} -> {}", renamed.from.trim(), renamed.to)),
        ]);
    }
    for (oid, id) in &summary.new_ids {
        table.add_row(vec![
            Cell::new("new id").fg(Color::Green),
            Cell::new(oid),
            Cell::new(id),
        ]);
    }
    println!();
    println!("Changes:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
