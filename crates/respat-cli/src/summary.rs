use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use respat_cli::types::{FileSummary, JobResult};

pub fn print_summary(result: &JobResult) {
    println!("Lab: {}", result.lab);
    println!("Output: {}", result.output.display());
    if let Some(path) = &result.duplicates_file {
        println!("Duplicates: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Layout"),
        header_cell("Rows"),
        header_cell("Seen"),
        header_cell("New"),
        header_cell("Records"),
    ]);
    apply_table_style(&mut table);
    for column in 2..=5 {
        align_column(&mut table, column, CellAlignment::Right);
    }

    for file in &result.files {
        table.add_row(file_row(file));
    }
    if result.cache_rows > 0 {
        table.add_row(vec![
            dim_cell("(cache)"),
            dim_cell("-"),
            Cell::new(result.cache_rows),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new(result.cache_rows),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dropped_cell(result.duplicates_dropped),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(result.new_records()).add_attribute(Attribute::Bold),
        Cell::new(result.output_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if !result.files.is_empty() && result.all_previously_processed() {
        println!("All samples were previously processed.");
    }
}

fn file_row(file: &FileSummary) -> Vec<Cell> {
    if let Some(reason) = &file.skipped {
        return vec![
            Cell::new(&file.file).fg(Color::DarkGrey),
            Cell::new(format!("skipped: {reason}")).fg(Color::Yellow),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ];
    }
    vec![
        Cell::new(&file.file),
        Cell::new(file.layout.unwrap_or("-")),
        Cell::new(file.rows_in),
        Cell::new(file.seen),
        Cell::new(file.new).fg(if file.new > 0 { Color::Green } else { Color::DarkGrey }),
        Cell::new(file.records),
    ]
}

fn dropped_cell(dropped: usize) -> Cell {
    if dropped == 0 {
        dim_cell("no duplicates")
    } else {
        Cell::new(format!("{dropped} duplicates dropped")).fg(Color::Yellow)
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
