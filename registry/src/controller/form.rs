use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{
    consts::consts::PersonId,
    model::{
        person::{Person, PersonKindTag},
        validation::PersonFields,
    },
};

/// What confirming the form does: Alta, Modificación or Baja
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
    Delete,
}

impl FormMode {
    pub fn title(self) -> &'static str {
        match self {
            FormMode::Create => "Alta",
            FormMode::Update => "Modificación",
            FormMode::Delete => "Eliminacion",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Editable inputs of the form. The id is never editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    BirthDate,
    NationalId,
    OriginCountry,
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nombre" | "first_name" => Ok(FormField::FirstName),
            "apellido" | "last_name" => Ok(FormField::LastName),
            "fechanacimiento" | "fecha" | "birth_date" => Ok(FormField::BirthDate),
            "dni" | "national_id" => Ok(FormField::NationalId),
            "paisorigen" | "pais" | "origin_country" => Ok(FormField::OriginCountry),
            _ => Err(FormError::UnknownField(s.trim().to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("No form is open")]
    NoFormOpen,

    #[error("The record type cannot change in {0} mode")]
    KindLocked(FormMode),

    #[error("Fields cannot be edited in {0} mode")]
    FieldsDisabled(FormMode),

    #[error("Field {0:?} does not apply to the selected record type")]
    FieldHidden(FormField),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("No record with id {0}")]
    UnknownRecord(PersonId),

    #[error("The form has no record id")]
    MissingId,
}

/// How each input is presented for the current mode and selected type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    pub title: &'static str,
    pub id_visible: bool,
    pub kind_selectable: bool,
    pub fields_editable: bool,
    pub citizen_inputs_visible: bool,
    pub foreigner_inputs_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    mode: FormMode,
    fields: PersonFields,
}

impl FormState {
    /// Empty form, no type selected
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            fields: PersonFields::default(),
        }
    }

    /// Form pre-filled from an existing record
    pub fn for_record(mode: FormMode, person: &Person) -> Self {
        Self {
            mode,
            fields: PersonFields::from_person(person),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &PersonFields {
        &self.fields
    }

    pub fn layout(&self) -> FormLayout {
        FormLayout {
            title: self.mode.title(),
            id_visible: self.mode != FormMode::Create,
            kind_selectable: self.mode == FormMode::Create,
            fields_editable: self.mode != FormMode::Delete,
            citizen_inputs_visible: self.fields.kind == Some(PersonKindTag::Citizen),
            foreigner_inputs_visible: self.fields.kind == Some(PersonKindTag::Foreigner),
        }
    }

    /// Only a new record may pick its type
    pub fn set_kind(&mut self, kind: PersonKindTag) -> Result<(), FormError> {
        if self.mode != FormMode::Create {
            return Err(FormError::KindLocked(self.mode));
        }

        self.fields.kind = Some(kind);

        Ok(())
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<(), FormError> {
        if self.mode == FormMode::Delete {
            return Err(FormError::FieldsDisabled(self.mode));
        }

        let layout = self.layout();
        let value = value.into();

        match field {
            FormField::FirstName => self.fields.first_name = value,
            FormField::LastName => self.fields.last_name = value,
            FormField::BirthDate => self.fields.birth_date = value,
            FormField::NationalId if layout.citizen_inputs_visible => {
                self.fields.national_id = value
            }
            FormField::OriginCountry if layout.foreigner_inputs_visible => {
                self.fields.origin_country = value
            }
            FormField::NationalId | FormField::OriginCountry => {
                return Err(FormError::FieldHidden(field))
            }
        }

        Ok(())
    }
}
