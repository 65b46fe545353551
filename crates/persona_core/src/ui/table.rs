//! Table view model for the record list.
//!
//! # Responsibility
//! - Turn the cached records into display rows, from scratch every time.
//! - Map clicks on a row or its action controls to commands.
//!
//! # Invariants
//! - Column order is fixed: id, first name, last name, sex, birth date,
//!   role, actions.
//! - A click on an action control never also triggers the row's edit.

use crate::model::persona::{PersonaId, PersonaRecord};
use std::fmt::Write as _;

pub const NO_DATA_MESSAGE: &str = "No se encontraron datos de personas.";
pub const TABLE_HEADERS: [&str; 7] = [
    "Id", "Nombre", "Apellido", "Sexo", "Fh nac", "Rol", "Acciones",
];
pub const EDIT_LABEL: &str = "Editar";
pub const DELETE_LABEL: &str = "Borrar";

/// Where a click landed inside a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Any data cell or empty row space.
    Cell,
    EditButton,
    DeleteButton,
}

/// Command produced by a row interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowCommand {
    Edit(PersonaId),
    Delete {
        id: PersonaId,
        display_name: String,
    },
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: PersonaId,
    /// Data cells in header order, without the actions column.
    pub cells: [String; 6],
    pub display_name: String,
}

impl TableRow {
    fn from_record(record: &PersonaRecord) -> Self {
        Self {
            id: record.id,
            cells: [
                record.id.to_string(),
                record.nombre.clone(),
                record.apellido.clone(),
                record.sexo.clone().unwrap_or_default(),
                record.fh_nac.clone().unwrap_or_default(),
                record.rol.clone().unwrap_or_default(),
            ],
            display_name: record.display_name(),
        }
    }

    /// Command for a click on `target`.
    pub fn command_for(&self, target: ClickTarget) -> RowCommand {
        match target {
            ClickTarget::Cell | ClickTarget::EditButton => RowCommand::Edit(self.id),
            ClickTarget::DeleteButton => RowCommand::Delete {
                id: self.id,
                display_name: self.display_name.clone(),
            },
        }
    }
}

/// What the table area currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    /// Nothing loaded yet.
    Pending,
    /// Loaded, but no records.
    NoData,
    /// Last load failed; holds the full inline message.
    Error(String),
    Table(Vec<TableRow>),
}

impl TableView {
    /// Message shown instead of a table, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NoData => Some(NO_DATA_MESSAGE),
            Self::Error(message) => Some(message),
            Self::Pending | Self::Table(_) => None,
        }
    }

    /// Rendered rows; empty unless the view is a table.
    pub fn rows(&self) -> &[TableRow] {
        match self {
            Self::Table(rows) => rows,
            _ => &[],
        }
    }

    pub fn has_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        match self {
            Self::Pending => String::new(),
            Self::NoData | Self::Error(_) => self.message().unwrap_or_default().to_string(),
            Self::Table(rows) => render_rows_text(rows),
        }
    }
}

/// Renders `records`; an empty slice yields `TableView::NoData`.
pub fn render(records: &[PersonaRecord]) -> TableView {
    if records.is_empty() {
        return TableView::NoData;
    }
    TableView::Table(records.iter().map(TableRow::from_record).collect())
}

/// Inline view for a failed list load.
pub fn load_error_view(reason: &str) -> TableView {
    TableView::Error(format!("⚠️ Error al cargar los datos: {reason}"))
}

fn render_rows_text(rows: &[TableRow]) -> String {
    let actions = format!("[{EDIT_LABEL}] [{DELETE_LABEL}]");
    let mut widths: Vec<usize> = TABLE_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.cells.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }
    widths[6] = widths[6].max(actions.chars().count());

    let mut out = String::new();
    let header: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in rows {
        let mut cells: Vec<String> = row.cells.to_vec();
        cells.push(actions.clone());
        push_line(&mut out, &cells, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

#[cfg(test)]
mod tests {
    use super::{render, ClickTarget, RowCommand, TableView, NO_DATA_MESSAGE};
    use crate::model::persona::PersonaRecord;

    fn sample() -> PersonaRecord {
        let mut record = PersonaRecord::new(4, "Ana", "Ruiz");
        record.sexo = Some("F".to_string());
        record.rol = Some("Profesor".to_string());
        record
    }

    #[test]
    fn empty_records_render_no_data_message() {
        let view = render(&[]);
        assert_eq!(view, TableView::NoData);
        assert_eq!(view.message(), Some(NO_DATA_MESSAGE));
        assert!(!view.has_table());
    }

    #[test]
    fn rows_follow_fixed_column_order_with_blank_absent_values() {
        let view = render(&[sample()]);
        let row = &view.rows()[0];
        assert_eq!(
            row.cells,
            ["4", "Ana", "Ruiz", "F", "", "Profesor"].map(String::from)
        );
    }

    #[test]
    fn action_clicks_do_not_fall_through_to_row_edit() {
        let view = render(&[sample()]);
        let row = &view.rows()[0];
        assert_eq!(row.command_for(ClickTarget::Cell), RowCommand::Edit(4));
        assert_eq!(
            row.command_for(ClickTarget::EditButton),
            RowCommand::Edit(4)
        );
        assert_eq!(
            row.command_for(ClickTarget::DeleteButton),
            RowCommand::Delete {
                id: 4,
                display_name: "Ana Ruiz".to_string()
            }
        );
    }

    #[test]
    fn text_rendering_lists_headers_and_actions() {
        let text = render(&[sample()]).render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Id"));
        assert!(lines[0].ends_with("Acciones"));
        assert!(lines[2].contains("[Editar] [Borrar]"));
    }
}
