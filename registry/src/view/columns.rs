use std::{fmt, str::FromStr};

use thiserror::Error;

use super::filter::PersonFilter;

/// Data columns of the person table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    FirstName,
    LastName,
    BirthDate,
    NationalId,
    OriginCountry,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Id,
        Column::FirstName,
        Column::LastName,
        Column::BirthDate,
        Column::NationalId,
        Column::OriginCountry,
    ];

    fn index(self) -> usize {
        match self {
            Column::Id => 0,
            Column::FirstName => 1,
            Column::LastName => 2,
            Column::BirthDate => 3,
            Column::NationalId => 4,
            Column::OriginCountry => 5,
        }
    }

    /// Wire field name, also what the terminal accepts
    pub fn field_name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::FirstName => "nombre",
            Column::LastName => "apellido",
            Column::BirthDate => "fechaNacimiento",
            Column::NationalId => "dni",
            Column::OriginCountry => "paisOrigen",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Column::Id | Column::NationalId)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = match self {
            Column::Id => "ID",
            Column::FirstName => "Nombre",
            Column::LastName => "Apellido",
            Column::BirthDate => "Fecha de nacimiento",
            Column::NationalId => "DNI",
            Column::OriginCountry => "País de origen",
        };

        write!(f, "{}", header)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColumnError {
    #[error("Unknown column: {0}")]
    Unknown(String),

    #[error("Column '{0}' cannot be shown with the current filter")]
    Disabled(Column),
}

impl FromStr for Column {
    type Err = ColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();

        match normalized.as_str() {
            "id" => Ok(Column::Id),
            "nombre" | "first_name" => Ok(Column::FirstName),
            "apellido" | "last_name" => Ok(Column::LastName),
            "fechanacimiento" | "fecha" | "birth_date" => Ok(Column::BirthDate),
            "dni" | "national_id" => Ok(Column::NationalId),
            "paisorigen" | "pais" | "origin_country" => Ok(Column::OriginCountry),
            _ => Err(ColumnError::Unknown(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnToggle {
    checked: bool,
    disabled: bool,
}

/// Checkbox state of every column. A filter can force a column off, a forced column cannot be
/// toggled back on until the filter changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnVisibility {
    toggles: [ColumnToggle; 6],
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self {
            toggles: [ColumnToggle {
                checked: true,
                disabled: false,
            }; 6],
        }
    }
}

impl ColumnVisibility {
    /// Forces off the column the filtered variant cannot fill
    pub fn apply_filter(&mut self, filter: PersonFilter) {
        let forced_off = match filter {
            PersonFilter::Citizens => Some(Column::OriginCountry),
            PersonFilter::Foreigners => Some(Column::NationalId),
            PersonFilter::All => None,
        };

        for column in Column::ALL {
            let toggle = &mut self.toggles[column.index()];

            if Some(column) == forced_off {
                toggle.checked = false;
                toggle.disabled = true;
            } else {
                toggle.disabled = false;
            }
        }
    }

    /// Flips the checkbox, returns whether the column is now visible
    pub fn toggle(&mut self, column: Column) -> Result<bool, ColumnError> {
        let toggle = &mut self.toggles[column.index()];

        if toggle.disabled {
            return Err(ColumnError::Disabled(column));
        }

        toggle.checked = !toggle.checked;

        Ok(toggle.checked)
    }

    pub fn is_visible(&self, column: Column) -> bool {
        self.toggles[column.index()].checked
    }

    pub fn is_disabled(&self, column: Column) -> bool {
        self.toggles[column.index()].disabled
    }

    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_visible_by_default() {
        assert_eq!(ColumnVisibility::default().visible_columns(), Column::ALL);
    }

    #[test]
    fn citizen_filter_forces_origin_country_off() {
        let mut visibility = ColumnVisibility::default();

        visibility.apply_filter(PersonFilter::Citizens);

        assert!(!visibility.is_visible(Column::OriginCountry));
        assert!(visibility.is_disabled(Column::OriginCountry));
        assert!(visibility.is_visible(Column::NationalId));
        assert_eq!(
            visibility.toggle(Column::OriginCountry),
            Err(ColumnError::Disabled(Column::OriginCountry))
        );
    }

    #[test]
    fn foreigner_filter_forces_national_id_off() {
        let mut visibility = ColumnVisibility::default();

        visibility.apply_filter(PersonFilter::Foreigners);

        assert!(!visibility.is_visible(Column::NationalId));
        assert!(visibility.is_disabled(Column::NationalId));
        assert!(visibility.is_visible(Column::OriginCountry));
    }

    #[test]
    fn clearing_filter_enables_but_keeps_unchecked() {
        // Given a column forced off by a filter
        let mut visibility = ColumnVisibility::default();
        visibility.apply_filter(PersonFilter::Foreigners);

        // When the filter is cleared
        visibility.apply_filter(PersonFilter::All);

        // Then the checkbox is usable again but still unchecked
        assert!(!visibility.is_disabled(Column::NationalId));
        assert!(!visibility.is_visible(Column::NationalId));
        assert_eq!(visibility.toggle(Column::NationalId), Ok(true));
    }

    #[test]
    fn toggle_hides_and_shows() {
        let mut visibility = ColumnVisibility::default();

        assert_eq!(visibility.toggle(Column::BirthDate), Ok(false));
        assert!(!visibility.visible_columns().contains(&Column::BirthDate));
        assert_eq!(visibility.toggle(Column::BirthDate), Ok(true));
    }

    #[test]
    fn parses_wire_and_english_names() {
        assert_eq!("fechaNacimiento".parse(), Ok(Column::BirthDate));
        assert_eq!("paisOrigen".parse(), Ok(Column::OriginCountry));
        assert_eq!("last_name".parse(), Ok(Column::LastName));
        assert_eq!(
            "patente".parse::<Column>(),
            Err(ColumnError::Unknown("patente".to_string()))
        );
    }
}
