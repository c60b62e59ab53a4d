use std::fmt;

use crate::{
    consts::consts::{PersonId, NOT_AVAILABLE},
    model::person::Person,
};

use super::columns::{Column, ColumnVisibility};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(u64),
    /// The record's variant does not carry this column
    NotAvailable,
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => write!(f, "{}", text),
            Cell::Number(number) => write!(f, "{}", number),
            Cell::NotAvailable => write!(f, "{}", NOT_AVAILABLE),
            Cell::Empty => Ok(()),
        }
    }
}

pub fn cell(person: &Person, column: Column) -> Cell {
    match column {
        Column::Id => match person.id {
            Some(id) => Cell::Number(id.to_number()),
            None => Cell::Empty,
        },
        Column::FirstName => Cell::Text(person.first_name.clone()),
        Column::LastName => Cell::Text(person.last_name.clone()),
        Column::BirthDate => Cell::Text(person.birth_date.clone()),
        Column::NationalId => match person.national_id() {
            Some(national_id) => Cell::Number(national_id),
            None => Cell::NotAvailable,
        },
        Column::OriginCountry => match person.origin_country() {
            Some(origin_country) => Cell::Text(origin_country.to_string()),
            None => Cell::NotAvailable,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Used by row actions (edit / delete) to find the record back
    pub id: Option<PersonId>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

/// Projects the records onto the visible columns, in the given order
pub fn render_table(people: &[Person], visibility: &ColumnVisibility) -> Table {
    let columns = visibility.visible_columns();

    let rows = people
        .iter()
        .map(|person| TableRow {
            id: person.id,
            cells: columns.iter().map(|column| cell(person, *column)).collect(),
        })
        .collect();

    Table { columns, rows }
}
