use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query/field names that live inside the embedded `address` document.
pub const ADDRESS_FIELDS: [&str; 5] = ["street", "postal", "number", "country", "city"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub postal: String,
    pub number: String,
    pub country: String,
    pub city: String,
}

impl Address {
    /// Looks up an address field by its query-parameter name.
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "street" => Some(&self.street),
            "postal" => Some(&self.postal),
            "number" => Some(&self.number),
            "country" => Some(&self.country),
            "city" => Some(&self.city),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub species: String,
    pub age: Option<i32>,
    pub gender: String,
    pub profile_img: String,
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    /// Text form of a top-level field, as compared by direct filters.
    /// Unknown fields yield `None`.
    pub fn field_text(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "description" => Some(self.description.clone()),
            "species" => Some(self.species.clone()),
            "age" => self.age.map(|age| age.to_string()),
            "gender" => Some(self.gender.clone()),
            "profile_img" => Some(self.profile_img.clone()),
            _ => None,
        }
    }
}

/// Everything a user supplies when creating or editing a pet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetData {
    pub name: String,
    pub description: String,
    pub species: String,
    pub age: Option<i32>,
    pub gender: String,
    pub profile_img: String,
    pub address: Address,
}

impl PetData {
    pub fn into_pet(self) -> Pet {
        let now = Utc::now();
        Pet {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            species: self.species,
            age: self.age,
            gender: self.gender,
            profile_img: self.profile_img,
            address: self.address,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_field_lookup_covers_every_address_key() {
        let address = Address {
            street: "Av. Larco".to_string(),
            postal: "15074".to_string(),
            number: "101".to_string(),
            country: "PE".to_string(),
            city: "Lima".to_string(),
        };
        for key in ADDRESS_FIELDS {
            assert!(address.field(key).is_some(), "missing {}", key);
        }
        assert_eq!(address.field("city"), Some("Lima"));
        assert_eq!(address.field("planet"), None);
    }

    #[test]
    fn field_text_uses_string_form_and_rejects_unknown_fields() {
        let pet = PetData {
            name: "Milo".to_string(),
            species: "cat".to_string(),
            age: Some(3),
            ..Default::default()
        }
        .into_pet();

        assert_eq!(pet.field_text("age").as_deref(), Some("3"));
        assert_eq!(pet.field_text("species").as_deref(), Some("cat"));
        assert_eq!(pet.field_text("id"), Some(pet.id.to_string()));
        assert_eq!(pet.field_text("owner"), None);
        assert_eq!(pet.field_text("city"), None);
    }
}
