use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;

use crate::consts::consts::{PersonId, MIN_BIRTH_YEAR};

use super::person::{Person, PersonKind, PersonKindTag};

/// Rejections raised before a record is sent anywhere. Messages are shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("El nombre no puede estar vacío.")]
    EmptyFirstName,

    #[error("El apellido no puede estar vacío.")]
    EmptyLastName,

    #[error("La fecha de nacimiento debe ser un número.")]
    BirthDateNotANumber,

    #[error("La fecha de nacimiento debe tener exactamente 8 dígitos.")]
    BirthDateLength,

    #[error("El año debe estar entre {0} y el año actual.")]
    BirthYearOutOfRange(i32),

    #[error("El mes debe estar entre 01 y 12.")]
    BirthMonthOutOfRange,

    #[error("El día debe estar entre 01 y {days_in_month} para el mes {month}.")]
    BirthDayOutOfRange { days_in_month: u32, month: u32 },

    #[error("El DNI debe ser mayor a 0.")]
    NationalIdNotPositive,

    #[error("El pais de Origen no puede estar vacio.")]
    EmptyOriginCountry,

    #[error("Tipo seleccionado no válido. Por favor, seleccione 'ciudadano' o 'extranjero'.")]
    MissingKind,
}

/// Accepted birth year range, inclusive on both ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub min_year: i32,
    pub max_year: i32,
}

impl ValidationPolicy {
    /// Fixes the upper bound, keeps validation deterministic regardless of the wall clock
    pub fn with_current_year(current_year: i32) -> Self {
        Self {
            min_year: MIN_BIRTH_YEAR,
            max_year: current_year,
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::with_current_year(Local::now().year())
    }
}

/// Raw values as typed into the form, before any parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFields {
    pub id: Option<PersonId>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub national_id: String,
    pub origin_country: String,
    pub kind: Option<PersonKindTag>,
}

impl PersonFields {
    pub fn from_person(person: &Person) -> Self {
        let (national_id, origin_country) = match &person.kind {
            PersonKind::Citizen { national_id } => (national_id.to_string(), String::new()),
            PersonKind::Foreigner { origin_country } => (String::new(), origin_country.clone()),
        };

        PersonFields {
            id: person.id,
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            birth_date: person.birth_date.clone(),
            national_id,
            origin_country,
            kind: Some(person.tag()),
        }
    }
}

/// Checks the fields in display order and builds the typed record from them.
/// Only the first failing rule is reported.
pub fn validate_person(
    fields: &PersonFields,
    policy: &ValidationPolicy,
) -> Result<Person, ValidationError> {
    let first_name = fields.first_name.trim();
    if first_name.is_empty() {
        return Err(ValidationError::EmptyFirstName);
    }

    let last_name = fields.last_name.trim();
    if last_name.is_empty() {
        return Err(ValidationError::EmptyLastName);
    }

    validate_birth_date(&fields.birth_date, policy)?;

    let kind = match fields.kind {
        Some(PersonKindTag::Citizen) => PersonKind::Citizen {
            national_id: validate_national_id(&fields.national_id)?,
        },
        Some(PersonKindTag::Foreigner) => PersonKind::Foreigner {
            origin_country: validate_origin_country(&fields.origin_country)?,
        },
        None => return Err(ValidationError::MissingKind),
    };

    Ok(Person {
        id: fields.id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birth_date: fields.birth_date.clone(),
        kind,
    })
}

/// `YYYYMMDD`, a real calendar date with the year inside the policy range
pub fn validate_birth_date(date: &str, policy: &ValidationPolicy) -> Result<(), ValidationError> {
    if !date.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::BirthDateNotANumber);
    }

    if date.len() != 8 {
        return Err(ValidationError::BirthDateLength);
    }

    // All ascii digits, slicing and parsing cannot fail
    let year: i32 = date[0..4].parse().unwrap_or_default();
    let month: u32 = date[4..6].parse().unwrap_or_default();
    let day: u32 = date[6..8].parse().unwrap_or_default();

    if year < policy.min_year || year > policy.max_year {
        return Err(ValidationError::BirthYearOutOfRange(policy.min_year));
    }

    if !(1..=12).contains(&month) {
        return Err(ValidationError::BirthMonthOutOfRange);
    }

    let days_in_month = days_in_month(year, month);
    if day < 1 || day > days_in_month {
        return Err(ValidationError::BirthDayOutOfRange {
            days_in_month,
            month,
        });
    }

    Ok(())
}

fn validate_national_id(national_id: &str) -> Result<u64, ValidationError> {
    match national_id.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::NationalIdNotPositive),
    }
}

fn validate_origin_country(origin_country: &str) -> Result<String, ValidationError> {
    let origin_country = origin_country.trim();

    if origin_country.is_empty() {
        return Err(ValidationError::EmptyOriginCountry);
    }

    Ok(origin_country.to_string())
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last_day| last_day.day())
        .unwrap_or(31)
}
