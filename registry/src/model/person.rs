use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::consts::consts::PersonId;

/// A person record, either a citizen or a foreigner
///
/// Shared fields live on the struct, the variant specific field lives on [`PersonKind`]. On the
/// wire the variant is not tagged, see [`RawPerson`] for the decoding rule.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "RawPerson")]
pub struct Person {
    /// `None` until the server acknowledges the creation
    pub id: Option<PersonId>,
    pub first_name: String,
    pub last_name: String,
    /// `YYYYMMDD`, no separators
    pub birth_date: String,
    pub kind: PersonKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersonKind {
    Citizen { national_id: u64 },
    Foreigner { origin_country: String },
}

/// Variant selector without its payload, what the form's type dropdown holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PersonKindTag {
    Citizen,
    Foreigner,
}

impl Person {
    pub fn citizen(
        id: Option<PersonId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: impl Into<String>,
        national_id: u64,
    ) -> Self {
        Person {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: birth_date.into(),
            kind: PersonKind::Citizen { national_id },
        }
    }

    pub fn foreigner(
        id: Option<PersonId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: impl Into<String>,
        origin_country: impl Into<String>,
    ) -> Self {
        Person {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: birth_date.into(),
            kind: PersonKind::Foreigner {
                origin_country: origin_country.into(),
            },
        }
    }

    pub fn tag(&self) -> PersonKindTag {
        match self.kind {
            PersonKind::Citizen { .. } => PersonKindTag::Citizen,
            PersonKind::Foreigner { .. } => PersonKindTag::Foreigner,
        }
    }

    pub fn is_citizen(&self) -> bool {
        self.tag() == PersonKindTag::Citizen
    }

    pub fn is_foreigner(&self) -> bool {
        self.tag() == PersonKindTag::Foreigner
    }

    pub fn national_id(&self) -> Option<u64> {
        match &self.kind {
            PersonKind::Citizen { national_id } => Some(*national_id),
            PersonKind::Foreigner { .. } => None,
        }
    }

    pub fn origin_country(&self) -> Option<&str> {
        match &self.kind {
            PersonKind::Citizen { .. } => None,
            PersonKind::Foreigner { origin_country } => Some(origin_country),
        }
    }

    /// Returns a copy carrying the server assigned id
    pub fn with_id(mut self, id: PersonId) -> Self {
        self.id = Some(id);
        self
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "ID: {}", id)?,
            None => write!(f, "ID: -")?,
        }

        write!(
            f,
            ", Nombre: {}, Apellido: {}, Fecha de nacimiento: {}",
            self.first_name, self.last_name, self.birth_date
        )?;

        match &self.kind {
            PersonKind::Citizen { national_id } => write!(f, ", DNI: {}", national_id),
            PersonKind::Foreigner { origin_country } => {
                write!(f, ", País de Origen: {}", origin_country)
            }
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Tipo desconocido: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for PersonKindTag {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ciudadano" | "citizen" => Ok(PersonKindTag::Citizen),
            "extranjero" | "foreigner" => Ok(PersonKindTag::Foreigner),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for PersonKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonKindTag::Citizen => write!(f, "ciudadano"),
            PersonKindTag::Foreigner => write!(f, "extranjero"),
        }
    }
}

/// Wire shape of a person. Base fields are merged with the single variant field.
#[derive(Serialize)]
struct PersonWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<PersonId>,
    nombre: &'a str,
    apellido: &'a str,
    #[serde(rename = "fechaNacimiento")]
    fecha_nacimiento: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dni: Option<u64>,
    #[serde(rename = "paisOrigen", skip_serializing_if = "Option::is_none")]
    pais_origen: Option<&'a str>,
}

impl Serialize for Person {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PersonWire {
            id: self.id,
            nombre: &self.first_name,
            apellido: &self.last_name,
            fecha_nacimiento: &self.birth_date,
            dni: self.national_id(),
            pais_origen: self.origin_country(),
        }
        .serialize(serializer)
    }
}

/// The public API serves birth dates as integers, forms send them as text
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum BirthDateWire {
    Text(String),
    Number(u64),
}

impl BirthDateWire {
    fn into_text(self) -> String {
        match self {
            BirthDateWire::Text(text) => text,
            BirthDateWire::Number(number) => number.to_string(),
        }
    }
}

/// Untyped person as it arrives from the API
///
/// The variant is inferred from which optional field is set:
/// 1. a string `paisOrigen` makes a foreigner, even if `dni` is also present
/// 2. otherwise an unsigned integer `dni` makes a citizen
/// 3. otherwise the record cannot be typed and the loader drops it
#[derive(Deserialize, Debug)]
pub(crate) struct RawPerson {
    #[serde(default)]
    id: Option<PersonId>,
    nombre: String,
    apellido: String,
    #[serde(rename = "fechaNacimiento")]
    fecha_nacimiento: BirthDateWire,
    #[serde(default)]
    dni: Option<serde_json::Value>,
    #[serde(rename = "paisOrigen", default)]
    pais_origen: Option<serde_json::Value>,
}

#[derive(Error, Debug, PartialEq)]
#[error("record has neither a 'paisOrigen' nor a 'dni' field")]
pub struct MissingVariant;

impl TryFrom<RawPerson> for Person {
    type Error = MissingVariant;

    fn try_from(raw: RawPerson) -> Result<Self, Self::Error> {
        let kind = match (raw.pais_origen, raw.dni) {
            (Some(serde_json::Value::String(origin_country)), _) => {
                PersonKind::Foreigner { origin_country }
            }
            (_, Some(dni)) => match dni.as_u64() {
                Some(national_id) => PersonKind::Citizen { national_id },
                None => return Err(MissingVariant),
            },
            _ => return Err(MissingVariant),
        };

        Ok(Person {
            id: raw.id,
            first_name: raw.nombre,
            last_name: raw.apellido,
            birth_date: raw.fecha_nacimiento.into_text(),
            kind,
        })
    }
}

#[cfg(test)]
impl Person {
    pub fn new_test_citizen(id: u64) -> Self {
        Person::citizen(Some(PersonId(id)), "Ana", "Diaz", "19900101", 30_123_456)
    }

    pub fn new_test_foreigner(id: u64) -> Self {
        Person::foreigner(Some(PersonId(id)), "John", "Smith", "19851224", "Uruguay")
    }
}
