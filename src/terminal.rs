use std::io::{self, Write};

use num_format::{Locale, ToFormattedString};
use registry::{
    controller::{
        form::FormState,
        notify::{Notification, NotificationLevel, Notifier},
    },
    view::{
        columns::{Column, ColumnVisibility},
        filter::PersonFilter,
        sort::SortDirection,
        table::{Cell, Table},
    },
};

/// Prints notifications on stdout and the busy indicator on stderr
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => println!("[ok] {}", notification),
            NotificationLevel::Error => println!("[error] {}", notification),
        }
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            eprint!("Cargando...");
        } else {
            eprintln!();
        }

        let _ = io::stderr().flush();
    }
}

/// National ids are grouped the way they are written in Argentina, ids are printed as-is
fn format_cell(column: Column, cell: &Cell) -> String {
    match (column, cell) {
        (Column::NationalId, Cell::Number(national_id)) => {
            national_id.to_formatted_string(&Locale::es)
        }
        _ => cell.to_string(),
    }
}

pub fn direction_label(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ascendente",
        SortDirection::Descending => "descendente",
    }
}

/// Active filter, direction of the next sort and one checkbox per column
pub fn render_status(
    filter: PersonFilter,
    next_sort: SortDirection,
    columns: &ColumnVisibility,
) -> String {
    let checkboxes: Vec<String> = Column::ALL
        .into_iter()
        .map(|column| {
            let mark = if columns.is_visible(column) { "x" } else { " " };
            let disabled = if columns.is_disabled(column) {
                " (deshabilitado)"
            } else {
                ""
            };

            format!("[{}] {}{}", mark, column.field_name(), disabled)
        })
        .collect();

    format!(
        "Filtro: {} | Próximo orden: {}\nColumnas: {}",
        filter,
        direction_label(next_sort),
        checkboxes.join("  ")
    )
}

pub fn render_table(table: &Table) -> String {
    if table.columns.is_empty() {
        return "(todas las columnas están ocultas)".to_string();
    }

    let headers: Vec<String> = table.columns.iter().map(|c| c.to_string()).collect();

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .zip(&row.cells)
                .map(|(column, cell)| format_cell(*column, cell))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);

    lines.push(render_line(&headers, &widths, &table.columns));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );

    for row in &rows {
        lines.push(render_line(row, &widths, &table.columns));
    }

    if rows.is_empty() {
        lines.push("(sin registros)".to_string());
    }

    lines.join("\n")
}

fn render_line(values: &[String], widths: &[usize], columns: &[Column]) -> String {
    values
        .iter()
        .zip(widths)
        .zip(columns)
        .map(|((value, width), column)| {
            let padding = " ".repeat(width.saturating_sub(value.chars().count()));

            if column.is_numeric() {
                format!("{}{}", padding, value)
            } else {
                format!("{}{}", value, padding)
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

pub fn render_form(form: &FormState) -> String {
    let layout = form.layout();
    let fields = form.fields();

    let lock = |locked: bool| if locked { " (bloqueado)" } else { "" };

    let mut lines = vec![format!("== {} ==", layout.title)];

    if layout.id_visible {
        let id = fields.id.map(|id| id.to_string()).unwrap_or_default();
        lines.push(format!("ID: {} (bloqueado)", id));
    }

    let kind = fields
        .kind
        .map(|kind| kind.to_string())
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("Tipo: {}{}", kind, lock(!layout.kind_selectable)));

    let fields_locked = !layout.fields_editable;
    lines.push(format!("Nombre: {}{}", fields.first_name, lock(fields_locked)));
    lines.push(format!("Apellido: {}{}", fields.last_name, lock(fields_locked)));
    lines.push(format!(
        "Fecha de nacimiento: {}{}",
        fields.birth_date,
        lock(fields_locked)
    ));

    if layout.citizen_inputs_visible {
        lines.push(format!("DNI: {}{}", fields.national_id, lock(fields_locked)));
    }

    if layout.foreigner_inputs_visible {
        lines.push(format!(
            "País de origen: {}{}",
            fields.origin_country,
            lock(fields_locked)
        ));
    }

    lines.join("\n")
}
