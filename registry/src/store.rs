use thiserror::Error;

use crate::{consts::consts::PersonId, model::person::Person};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    // CREATE
    #[error("Cannot add, record has no id yet")]
    CannotAddWithoutId,

    #[error("Cannot add, record already exists: {0}")]
    CannotAddWhenAlreadyExists(PersonId),

    // UPDATE
    #[error("Cannot update, record has no id")]
    CannotUpdateWithoutId,

    #[error("Cannot update, record does not exist: {0}")]
    CannotUpdateDoesNotExist(PersonId),

    // DELETE
    #[error("Cannot delete, record does not exist: {0}")]
    CannotDeleteDoesNotExist(PersonId),
}

/// Client side copy of the remote collection, kept in server order
#[derive(Debug, Default, Clone)]
pub struct PersonStore {
    people: Vec<Person>,
}

impl PersonStore {
    pub fn new() -> Self {
        Self { people: Vec::new() }
    }

    /// Replaces the whole content, as after a fresh load. Records repeating an id already seen
    /// are dropped so ids stay unique.
    pub fn replace_all(&mut self, people: Vec<Person>) {
        let mut unique: Vec<Person> = Vec::with_capacity(people.len());

        for person in people {
            if unique.iter().any(|kept| kept.id == person.id) {
                log::warn!("Dropping duplicate record: {}", person);
                continue;
            }

            unique.push(person);
        }

        self.people = unique;
    }

    /// Appends a record the server has acknowledged
    pub fn add(&mut self, person: Person) -> Result<(), StoreError> {
        let id = person.id.ok_or(StoreError::CannotAddWithoutId)?;

        if self.get(id).is_some() {
            return Err(StoreError::CannotAddWhenAlreadyExists(id));
        }

        self.people.push(person);

        Ok(())
    }

    /// Replaces the record with the same id, in place
    pub fn update(&mut self, person: Person) -> Result<Person, StoreError> {
        let id = person.id.ok_or(StoreError::CannotUpdateWithoutId)?;

        let index = self
            .index_of(id)
            .ok_or(StoreError::CannotUpdateDoesNotExist(id))?;

        Ok(std::mem::replace(&mut self.people[index], person))
    }

    pub fn remove(&mut self, id: PersonId) -> Result<Person, StoreError> {
        let index = self
            .index_of(id)
            .ok_or(StoreError::CannotDeleteDoesNotExist(id))?;

        Ok(self.people.remove(index))
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|person| person.id == Some(id))
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    fn index_of(&self, id: PersonId) -> Option<usize> {
        self.people.iter().position(|person| person.id == Some(id))
    }
}
