use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::model::person::Person;

use super::columns::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

enum SortKey<'a> {
    Text(&'a str),
    Number(u64),
}

/// Missing numbers order as 0, missing text as the empty string
fn sort_key(person: &Person, column: Column) -> SortKey<'_> {
    match column {
        Column::Id => SortKey::Number(person.id.map(|id| id.to_number()).unwrap_or(0)),
        Column::FirstName => SortKey::Text(&person.first_name),
        Column::LastName => SortKey::Text(&person.last_name),
        Column::BirthDate => SortKey::Text(&person.birth_date),
        Column::NationalId => SortKey::Number(person.national_id().unwrap_or(0)),
        Column::OriginCountry => SortKey::Text(person.origin_country().unwrap_or("")),
    }
}

fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
    match (a, b) {
        (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
        (SortKey::Text(a), SortKey::Text(b)) => locale_compare(a, b),
        // A column always yields the same key kind
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    }
}

/// Orders text the way a reader expects rather than by code point: case and accents only
/// break ties.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Lowercase base letters: canonical decomposition with the combining marks removed
fn collation_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());

    let letters = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase);

    for c in letters {
        // Letters whose stroke or ligature has no canonical decomposition
        match c {
            'ø' => key.push('o'),
            'ł' => key.push('l'),
            'đ' | 'ð' => key.push('d'),
            'ħ' => key.push('h'),
            'ı' => key.push('i'),
            'ß' => key.push_str("ss"),
            'æ' => key.push_str("ae"),
            'œ' => key.push_str("oe"),
            'þ' => key.push_str("th"),
            other => key.push(other),
        }
    }

    key
}

/// Stable sort on one column. Records that compare equal keep their relative order in both
/// directions.
#[tracing::instrument(skip(people))]
pub fn sort_people(people: &mut [Person], column: Column, direction: SortDirection) {
    people.sort_by(|a, b| {
        let ordering = compare_keys(&sort_key(a, column), &sort_key(b, column));

        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use crate::consts::consts::PersonId;

    use super::*;

    fn ids(people: &[Person]) -> Vec<u64> {
        people
            .iter()
            .map(|p| p.id.map(PersonId::to_number).unwrap_or(0))
            .collect()
    }

    fn people() -> Vec<Person> {
        vec![
            Person::citizen(Some(PersonId(3)), "Óscar", "Zapata", "19800101", 200),
            Person::foreigner(Some(PersonId(1)), "ana", "Pérez", "19700101", "Perú"),
            Person::citizen(Some(PersonId(4)), "Bruno", "alvarez", "19900101", 100),
            Person::foreigner(Some(PersonId(2)), "Álvaro", "Núñez", "19600101", "Chile"),
        ]
    }

    #[test]
    fn id_ascending_then_descending_are_reversed() {
        let mut ascending = people();
        sort_people(&mut ascending, Column::Id, SortDirection::Ascending);

        let mut descending = people();
        sort_people(&mut descending, Column::Id, SortDirection::Descending);

        assert_eq!(ids(&ascending), vec![1, 2, 3, 4]);

        let mut reversed = ids(&descending);
        reversed.reverse();
        assert_eq!(ids(&ascending), reversed);
    }

    #[test]
    fn text_ignores_case_and_accents() {
        let mut sorted = people();
        sort_people(&mut sorted, Column::FirstName, SortDirection::Ascending);

        let names: Vec<_> = sorted.iter().map(|p| p.first_name.as_str()).collect();
        assert_eq!(names, vec!["Álvaro", "ana", "Bruno", "Óscar"]);
    }

    #[test]
    fn missing_national_id_sorts_as_zero() {
        let mut sorted = people();
        sort_people(&mut sorted, Column::NationalId, SortDirection::Ascending);

        // Foreigners (0) first, in their original relative order
        assert_eq!(ids(&sorted), vec![1, 2, 4, 3]);
    }

    #[test]
    fn missing_origin_country_sorts_as_empty() {
        let mut sorted = people();
        sort_people(&mut sorted, Column::OriginCountry, SortDirection::Descending);

        assert_eq!(ids(&sorted), vec![1, 2, 3, 4]);
    }

    #[test]
    fn ties_keep_relative_order_in_both_directions() {
        let tied = vec![
            Person::citizen(Some(PersonId(1)), "A", "Same", "19900101", 1),
            Person::citizen(Some(PersonId(2)), "B", "Same", "19900101", 2),
            Person::citizen(Some(PersonId(3)), "C", "Same", "19900101", 3),
        ];

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let mut sorted = tied.clone();
            sort_people(&mut sorted, Column::LastName, direction);

            assert_eq!(ids(&sorted), vec![1, 2, 3]);
        }
    }

    #[test]
    fn locale_compare_breaks_ties_deterministically() {
        assert_eq!(locale_compare("peru", "Perú"), Ordering::Less);
        assert_eq!(locale_compare("perú", "Perú"), Ordering::Less);
        assert_eq!(locale_compare("abc", "abc"), Ordering::Equal);
    }

    #[test]
    fn accents_outside_spanish_sort_with_their_base_letter() {
        assert_eq!(locale_compare("Šimon", "Zoe"), Ordering::Less);
        assert_eq!(locale_compare("Øyvind", "Pablo"), Ordering::Less);
        assert_eq!(locale_compare("Łukasz", "Mario"), Ordering::Less);
        assert_eq!(locale_compare("Ýr", "Zoe"), Ordering::Less);
        assert_eq!(locale_compare("Straße", "Strasse"), Ordering::Greater);
    }

    #[test]
    fn foreign_names_sort_among_plain_ones() {
        let mut sorted = vec![
            Person::foreigner(Some(PersonId(1)), "Zoe", "A", "19900101", "Chile"),
            Person::foreigner(Some(PersonId(2)), "Łukasz", "B", "19900101", "Polonia"),
            Person::foreigner(Some(PersonId(3)), "Mario", "C", "19900101", "Italia"),
            Person::foreigner(Some(PersonId(4)), "Øyvind", "D", "19900101", "Noruega"),
            Person::foreigner(Some(PersonId(5)), "Šimon", "E", "19900101", "Chequia"),
        ];

        sort_people(&mut sorted, Column::FirstName, SortDirection::Ascending);

        assert_eq!(ids(&sorted), vec![2, 3, 4, 5, 1]);
    }

    #[test]
    fn direction_flips() {
        assert_eq!(SortDirection::Ascending.flip(), SortDirection::Descending);
        assert_eq!(SortDirection::Descending.flip().flip(), SortDirection::Descending);
    }
}
