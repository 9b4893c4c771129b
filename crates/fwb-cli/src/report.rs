//! Terminal output for a finished session.

use std::path::PathBuf;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fwb_model::SessionState;

/// One row of the services table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRow {
    pub name: String,
    pub lines: usize,
    pub selected: bool,
}

/// Owned view of a session, detached from its schema type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub services: Vec<ServiceRow>,
    pub selection: Option<String>,
    pub composed: String,
    pub query: String,
    pub plan: String,
    pub errors: Vec<String>,
    pub saved_to: Option<PathBuf>,
}

impl SessionReport {
    pub fn from_state<S>(state: &SessionState<S>) -> Self {
        let selected = state.selected_service();
        let services = state
            .documents
            .iter()
            .map(|(name, text)| ServiceRow {
                name: name.to_string(),
                lines: text.lines().count(),
                selected: selected == Some(name),
            })
            .collect();

        Self {
            services,
            selection: state.selection.as_ref().map(ToString::to_string),
            composed: state.composition.printed().to_string(),
            query: state.query.text.clone(),
            plan: state.query.plan.text.clone(),
            errors: state.errors().map(ToString::to_string).collect(),
            saved_to: None,
        }
    }

    #[must_use]
    pub fn with_saved_to(mut self, path: PathBuf) -> Self {
        self.saved_to = Some(path);
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Print only the composed schema, or the errors.
pub fn print_composed(report: &SessionReport) {
    if !report.composed.is_empty() {
        print!("{}", report.composed);
    }
    print_errors(report);
}

/// Print only the query plan, or the errors.
pub fn print_plan(report: &SessionReport) {
    if !report.plan.is_empty() {
        println!("{}", report.plan);
    }
    print_errors(report);
}

/// Print the services table followed by the derived artifacts.
pub fn print_summary(report: &SessionReport) {
    println!("{}", services_table(report));
    println!(
        "Selection: {}",
        report.selection.as_deref().unwrap_or("(none)")
    );
    if let Some(path) = &report.saved_to {
        println!("Saved: {}", path.display());
    }
    if !report.plan.is_empty() {
        println!();
        println!("Query plan:");
        println!("{}", report.plan);
    } else if !report.composed.is_empty() {
        println!("Composed schema: {} lines", report.composed.lines().count());
    }
    print_errors(report);
}

pub fn print_errors(report: &SessionReport) {
    if report.errors.is_empty() {
        return;
    }
    eprintln!("Errors:");
    for error in &report.errors {
        eprintln!("- {error}");
    }
}

/// Services table: name, line count and a selection marker.
pub fn services_table(report: &SessionReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Service"),
        header_cell("Lines"),
        header_cell("Selected"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);

    for row in &report.services {
        let selected = if row.selected {
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![Cell::new(&row.name), Cell::new(row.lines), selected]);
    }
    if report.services.is_empty() {
        table.add_row(vec![dim_cell("(no services)"), dim_cell("-"), dim_cell("-")]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
