use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
/// Server assigned identifier of a person record
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl PersonId {
    pub fn to_number(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersonIdError {
    #[error("Id is not a number: {0}")]
    NotANumber(String),

    #[error("Id must be greater than 0")]
    Zero,
}

impl TryFrom<&str> for PersonId {
    type Error = PersonIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();

        let id: u64 = value
            .parse()
            .map_err(|_| PersonIdError::NotANumber(value.to_string()))?;

        if id == 0 {
            return Err(PersonIdError::Zero);
        }

        Ok(PersonId(id))
    }
}

// Values
pub const DEFAULT_ENDPOINT: &str = "https://examenesutn.vercel.app/api/PersonaCiudadanoExtranjero";

pub const MIN_BIRTH_YEAR: i32 = 1900;

/// Shown in a table cell when the record's variant does not carry the column
pub const NOT_AVAILABLE: &str = "N/A";
