use std::future::Future;

use serde_json::Value;
use thiserror::Error;

use crate::{
    consts::consts::PersonId,
    model::person::{Person, RawPerson},
};

pub mod http;
pub mod memory;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    // Transport
    #[error("Unexpected response status: {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    // Decode
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// The request never produced a usable success response
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::Status(_) | GatewayError::Network(_) | GatewayError::Timeout
        )
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, GatewayError::Decode(_))
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// The remote person collection. Every operation targets the same resource, only the method
/// changes: GET lists, POST creates, PUT replaces, DELETE removes.
pub trait PersonApi {
    /// Fetches the whole collection. Records that cannot be typed are dropped.
    fn load(&self) -> impl Future<Output = GatewayResult<Vec<Person>>> + Send;

    /// Sends a record without id, resolves to the id assigned by the server
    fn create(&self, person: &Person) -> impl Future<Output = GatewayResult<PersonId>> + Send;

    /// Replaces the record carrying the same id, resolves to the server's message
    fn update(&self, person: &Person) -> impl Future<Output = GatewayResult<String>> + Send;

    fn delete(&self, id: PersonId) -> impl Future<Output = GatewayResult<()>> + Send;
}

/// Decodes a list response. The body must be a JSON array; elements that do not type as a
/// citizen or a foreigner, or lack an id, are skipped.
pub fn decode_people(body: &str) -> GatewayResult<Vec<Person>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::Decode(format!("response is not valid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        _ => return Err(GatewayError::Decode("response is not an array".to_string())),
    };

    let received = items.len();
    let mut people = Vec::with_capacity(received);

    for item in items {
        let raw: RawPerson = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Skipping malformed record: {}", e);
                continue;
            }
        };

        match Person::try_from(raw) {
            Ok(person) if person.id.is_some() => people.push(person),
            Ok(person) => log::warn!("Skipping record without id: {}", person),
            Err(e) => log::debug!("Skipping record: {}", e),
        }
    }

    log::debug!("Decoded {} of {} records", people.len(), received);

    Ok(people)
}

/// Extracts the id the server assigned to a created record
pub fn decode_created_id(body: &str) -> GatewayResult<PersonId> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::Decode(format!("response is not valid JSON: {}", e)))?;

    let id = match value.get("id") {
        Some(Value::Number(number)) => number.as_u64().filter(|id| *id > 0).map(PersonId),
        Some(Value::String(text)) => PersonId::try_from(text.as_str()).ok(),
        _ => None,
    };

    id.ok_or_else(|| GatewayError::Decode("response does not contain a valid id".to_string()))
}
