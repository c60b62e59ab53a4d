use std::str::FromStr;

use registry::{
    consts::consts::{PersonId, PersonIdError},
    controller::form::{FormError, FormField},
    model::person::{PersonKindTag, UnknownKind},
    view::{
        columns::{Column, ColumnError},
        filter::PersonFilter,
    },
};
use thiserror::Error;

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Table
    List,
    Reload,
    Filter(PersonFilter),
    Sort(Column),
    ToggleColumn(Column),

    // Form
    Add,
    Edit(PersonId),
    Delete(PersonId),
    Kind(PersonKindTag),
    Set(FormField, String),
    ShowForm,
    Accept,
    Cancel,

    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}', type 'help' for the list of commands")]
    Unknown(String),

    #[error("'{command}' expects {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error(transparent)]
    InvalidId(#[from] PersonIdError),

    #[error(transparent)]
    InvalidColumn(#[from] ColumnError),

    #[error(transparent)]
    InvalidField(#[from] FormError),

    #[error(transparent)]
    InvalidKind(#[from] UnknownKind),
}

pub const HELP: &str = "\
Comandos:
  list | l                      muestra la tabla
  reload                        vuelve a cargar los datos del servidor
  filter <todos|ciudadanos|extranjeros>
  sort <columna>                ordena, cada llamada invierte el sentido
  column <columna>              muestra u oculta una columna
  add | a                       abre el formulario de alta
  edit | e <id>                 abre el formulario de modificación
  delete | d <id>               abre el formulario de eliminación
  kind <ciudadano|extranjero>   tipo del nuevo registro
  set <campo> <valor>           nombre, apellido, fechaNacimiento, dni, paisOrigen
  form                          muestra el formulario abierto
  accept                        confirma el formulario
  cancel                        cierra el formulario
  help                          esta ayuda
  quit | q                      salir
Columnas: id, nombre, apellido, fechaNacimiento, dni, paisOrigen";

fn required<'a>(
    argument: Option<&'a str>,
    command: &'static str,
    name: &'static str,
) -> Result<&'a str, CommandError> {
    match argument {
        Some(argument) if !argument.trim().is_empty() => Ok(argument.trim()),
        _ => Err(CommandError::MissingArgument {
            command,
            argument: name,
        }),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (line, None),
        };

        let command = match name.to_lowercase().as_str() {
            "" => return Err(CommandError::Empty),
            "list" | "l" => Command::List,
            "reload" => Command::Reload,
            "filter" => Command::Filter(PersonFilter::from(required(rest, "filter", "a criterion")?)),
            "sort" => Command::Sort(required(rest, "sort", "a column")?.parse()?),
            "column" => Command::ToggleColumn(required(rest, "column", "a column")?.parse()?),
            "add" | "a" => Command::Add,
            "edit" | "e" => Command::Edit(PersonId::try_from(required(rest, "edit", "an id")?)?),
            "delete" | "d" => {
                Command::Delete(PersonId::try_from(required(rest, "delete", "an id")?)?)
            }
            "kind" => Command::Kind(required(rest, "kind", "a record type")?.parse()?),
            "set" => {
                let arguments = required(rest, "set", "a field and a value")?;

                // The value keeps its inner spaces, an absent value clears the field
                let (field, value) = match arguments.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (arguments, ""),
                };

                Command::Set(field.parse()?, value.to_string())
            }
            "form" => Command::ShowForm,
            "accept" => Command::Accept,
            "cancel" => Command::Cancel,
            "help" | "h" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}
