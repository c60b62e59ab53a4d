pub mod person;
pub mod validation;
