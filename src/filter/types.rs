use std::collections::BTreeMap;

use crate::database::models::{Pet, ADDRESS_FIELDS};

/// Top-level pet columns a direct filter may compare against.
pub const PET_COLUMNS: [&str; 7] = ["id", "name", "description", "species", "age", "gender", "profile_img"];

/// Equality predicates on top-level pet fields, keyed by column.
pub type DirectFilter = BTreeMap<String, String>;

/// Equality predicates on fields of the embedded address.
pub type AddressFilter = BTreeMap<String, String>;

/// A pet listing query split into the part the store evaluates and the part
/// applied to the store's candidates afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetQuery {
    pub direct: DirectFilter,
    pub address: AddressFilter,
}

impl PetQuery {
    /// Splits raw query parameters. Blank values impose no constraint and are
    /// dropped; address keys go to `address`, everything else to `direct`.
    pub fn partition<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut query = PetQuery::default();
        for (key, value) in params {
            let key = key.into();
            let value = value.into();
            if value.is_empty() {
                continue;
            }
            if is_address_field(&key) {
                query.address.insert(key, value);
            } else {
                query.direct.insert(key, value);
            }
        }
        query
    }

    /// First direct key that names no pet column, if any.
    pub fn unknown_direct_field(&self) -> Option<&str> {
        self.direct
            .keys()
            .map(String::as_str)
            .find(|key| !is_pet_column(key))
    }

    /// True when every address predicate matches exactly.
    pub fn matches_address(&self, pet: &Pet) -> bool {
        self.address
            .iter()
            .all(|(key, value)| pet.address.field(key) == Some(value.as_str()))
    }

    /// True when every direct predicate matches the pet's text form.
    pub fn matches_direct(filter: &DirectFilter, pet: &Pet) -> bool {
        filter
            .iter()
            .all(|(key, value)| pet.field_text(key).as_deref() == Some(value.as_str()))
    }
}

pub fn is_address_field(key: &str) -> bool {
    ADDRESS_FIELDS.contains(&key)
}

pub fn is_pet_column(key: &str) -> bool {
    PET_COLUMNS.contains(&key)
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Address, PetData};

    fn pet_in(city: &str, country: &str) -> Pet {
        PetData {
            name: "Milo".to_string(),
            species: "cat".to_string(),
            address: Address {
                city: city.to_string(),
                country: country.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
        .into_pet()
    }

    #[test]
    fn blank_values_are_not_constraints() {
        let query = PetQuery::partition([("species", "dog"), ("name", ""), ("city", "")]);
        assert_eq!(query.direct.len(), 1);
        assert_eq!(query.direct.get("species").map(String::as_str), Some("dog"));
        assert!(query.address.is_empty());
    }

    #[test]
    fn address_keys_are_split_from_direct_keys() {
        let query = PetQuery::partition([
            ("street", "Larco"),
            ("postal", "15074"),
            ("number", "101"),
            ("country", "PE"),
            ("city", "Lima"),
            ("species", "cat"),
            ("color", "black"),
        ]);
        assert_eq!(query.address.len(), 5);
        assert_eq!(query.direct.len(), 2);
        assert!(query.direct.contains_key("color"));
    }

    #[test]
    fn unknown_direct_field_is_reported() {
        let query = PetQuery::partition([("species", "cat"), ("color", "black")]);
        assert_eq!(query.unknown_direct_field(), Some("color"));

        let query = PetQuery::partition([("species", "cat"), ("age", "3")]);
        assert_eq!(query.unknown_direct_field(), None);
    }

    #[test]
    fn address_filter_is_a_conjunction() {
        let lima = pet_in("Lima", "PE");
        let quito = pet_in("Quito", "EC");

        let query = PetQuery::partition([("city", "Lima")]);
        assert!(query.matches_address(&lima));
        assert!(!query.matches_address(&quito));

        let query = PetQuery::partition([("city", "Lima"), ("country", "EC")]);
        assert!(!query.matches_address(&lima));
        assert!(!query.matches_address(&quito));
    }

    #[test]
    fn address_matching_is_case_sensitive() {
        let lima = pet_in("Lima", "PE");
        let query = PetQuery::partition([("city", "lima")]);
        assert!(!query.matches_address(&lima));
    }

    #[test]
    fn empty_address_filter_excludes_nothing() {
        let query = PetQuery::partition([("species", "cat")]);
        assert!(query.matches_address(&pet_in("", "")));
    }
}
