use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pgcf_model::{Framework, PLACEHOLDER_DESCRIPTION, ProficiencyLevel, Respondent, ResultRow};

/// Section headers with their topic counts.
pub fn domains_table(framework: &Framework) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Domain"),
        header_cell("Topics"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (index, section) in framework.sections.iter().enumerate() {
        let topics = if section.is_empty() {
            dim_cell(0)
        } else {
            Cell::new(section.rows.len())
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&section.header),
            topics,
        ]);
    }
    table
}

/// Selected levels, one row per topic.
pub fn results_table(rows: &[ResultRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Competency"),
        header_cell("Selected Level"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for row in rows {
        let description = if row.description == PLACEHOLDER_DESCRIPTION {
            dim_cell(&row.description)
        } else {
            Cell::new(&row.description)
        };
        table.add_row(vec![
            Cell::new(&row.competency),
            level_cell(row.level),
            description,
        ]);
    }
    table
}

/// The three respondent fields as a two-column table.
pub fn respondent_table(respondent: &Respondent) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    for (label, value) in [
        ("Name / ID", &respondent.identity),
        ("Job Title", &respondent.job_title),
        ("Role", &respondent.role),
    ] {
        table.add_row(vec![header_cell(label), Cell::new(value)]);
    }
    table
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

fn level_cell(level: ProficiencyLevel) -> Cell {
    let cell = Cell::new(level.as_str());
    match level {
        ProficiencyLevel::NotApplicable => cell.fg(Color::DarkGrey),
        ProficiencyLevel::Unfamiliar => cell.fg(Color::Yellow),
        _ => cell.fg(Color::Green).add_attribute(Attribute::Bold),
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
