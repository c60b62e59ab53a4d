use std::fmt;

use crate::model::person::Person;

/// Which variant the table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersonFilter {
    #[default]
    All,
    Citizens,
    Foreigners,
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        match self {
            PersonFilter::All => true,
            PersonFilter::Citizens => person.is_citizen(),
            PersonFilter::Foreigners => person.is_foreigner(),
        }
    }
}

/// Unknown criteria fall back to no filtering
impl From<&str> for PersonFilter {
    fn from(criterion: &str) -> Self {
        match criterion.trim().to_lowercase().as_str() {
            "ciudadano" | "ciudadanos" | "citizen" | "citizens" => PersonFilter::Citizens,
            "extranjero" | "extranjeros" | "foreigner" | "foreigners" => PersonFilter::Foreigners,
            _ => PersonFilter::All,
        }
    }
}

impl fmt::Display for PersonFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonFilter::All => write!(f, "todos"),
            PersonFilter::Citizens => write!(f, "ciudadanos"),
            PersonFilter::Foreigners => write!(f, "extranjeros"),
        }
    }
}

#[tracing::instrument(skip(people))]
pub fn filter(people: &[Person], criterion: PersonFilter) -> Vec<Person> {
    people
        .iter()
        .filter(|person| criterion.matches(person))
        .cloned()
        .collect()
}
