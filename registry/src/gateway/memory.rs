use std::{
    future::{ready, Future},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use serde_json::{json, Value};

use crate::{consts::consts::PersonId, model::person::Person};

use super::{decode_created_id, decode_people, GatewayError, GatewayResult, PersonApi};

pub const UPDATE_MESSAGE: &str = "Modificación exitosa";

/// Failure returned by the next request instead of touching the collection
#[derive(Debug, Clone, PartialEq)]
pub enum InjectedFailure {
    Status(u16),
    Timeout,
    /// Answers with a 2xx and this body, to exercise the decoders
    Body(String),
}

struct MemoryState {
    records: Vec<Value>,
    next_id: u64,
    injected: Option<InjectedFailure>,
}

/// In-process stand-in for the REST resource. Records are kept as JSON and every response goes
/// through the same decoders as the HTTP gateway.
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    requests: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seeds the collection with raw JSON records, as the server would hold them
    pub fn with_records(records: Vec<Value>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|record| record.get("id").and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: Mutex::new(MemoryState {
                records,
                next_id,
                injected: None,
            }),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_people(people: &[Person]) -> Self {
        Self::with_records(
            people
                .iter()
                .filter_map(|person| serde_json::to_value(person).ok())
                .collect(),
        )
    }

    /// Makes the next request fail, whatever its method
    pub fn fail_next(&self, failure: InjectedFailure) {
        self.lock().injected = Some(failure);
    }

    /// Number of requests received so far, failed ones included
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<Value> {
        self.lock().records.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts the request and consumes the injected failure, if any.
    /// `Ok(Some(body))` means the injected body replaces the real response.
    fn begin(&self, state: &mut MemoryState) -> GatewayResult<Option<String>> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        match state.injected.take() {
            Some(InjectedFailure::Status(status)) => Err(GatewayError::Status(status)),
            Some(InjectedFailure::Timeout) => Err(GatewayError::Timeout),
            Some(InjectedFailure::Body(body)) => Ok(Some(body)),
            None => Ok(None),
        }
    }

    fn position(records: &[Value], id: PersonId) -> Option<usize> {
        records
            .iter()
            .position(|record| record.get("id").and_then(Value::as_u64) == Some(id.to_number()))
    }

    fn load_now(&self) -> GatewayResult<Vec<Person>> {
        let mut state = self.lock();

        let body = match self.begin(&mut state)? {
            Some(body) => body,
            None => Value::Array(state.records.clone()).to_string(),
        };

        decode_people(&body)
    }

    fn create_now(&self, person: &Person) -> GatewayResult<PersonId> {
        let mut state = self.lock();

        let body = match self.begin(&mut state)? {
            Some(body) => body,
            None => {
                let id = PersonId(state.next_id);
                state.next_id += 1;

                let record = serde_json::to_value(person.clone().with_id(id))
                    .map_err(|e| GatewayError::Decode(e.to_string()))?;
                state.records.push(record);

                json!({ "id": id }).to_string()
            }
        };

        decode_created_id(&body)
    }

    fn update_now(&self, person: &Person) -> GatewayResult<String> {
        let mut state = self.lock();

        if let Some(body) = self.begin(&mut state)? {
            return Ok(body);
        }

        let id = person.id.ok_or(GatewayError::Status(400))?;
        let index = Self::position(&state.records, id).ok_or(GatewayError::Status(404))?;

        state.records[index] =
            serde_json::to_value(person).map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(UPDATE_MESSAGE.to_string())
    }

    fn delete_now(&self, id: PersonId) -> GatewayResult<()> {
        let mut state = self.lock();

        if self.begin(&mut state)?.is_some() {
            return Ok(());
        }

        let index = Self::position(&state.records, id).ok_or(GatewayError::Status(404))?;
        state.records.remove(index);

        Ok(())
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonApi for MemoryGateway {
    fn load(&self) -> impl Future<Output = GatewayResult<Vec<Person>>> + Send {
        ready(self.load_now())
    }

    fn create(&self, person: &Person) -> impl Future<Output = GatewayResult<PersonId>> + Send {
        ready(self.create_now(person))
    }

    fn update(&self, person: &Person) -> impl Future<Output = GatewayResult<String>> + Send {
        ready(self.update_now(person))
    }

    fn delete(&self, id: PersonId) -> impl Future<Output = GatewayResult<()>> + Send {
        ready(self.delete_now(id))
    }
}
