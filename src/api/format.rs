use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::{Pet, Role, User};

/// Public view of a user: everything except the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub pets: Vec<Uuid>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            pets: user.pets.clone(),
        }
    }
}

/// A user with their pets populated, as shown on the profile page.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub pets: Vec<Pet>,
}

impl ProfileView {
    pub fn new(user: &User, pets: Vec<Pet>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            pets,
        }
    }
}

/// Template name plus the locals it is rendered with. Serializes flat as
/// `{ "view": ..., <locals> }`.
#[derive(Debug, Clone)]
pub struct Page {
    pub view: &'static str,
    locals: Map<String, Value>,
}

impl Page {
    pub fn new(view: &'static str) -> Self {
        Self {
            view,
            locals: Map::new(),
        }
    }

    /// Adds a local; values that fail to serialize are rendered as `null`.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize page local '{}': {}", key, e);
            Value::Null
        });
        self.locals.insert(key.to_string(), value);
        self
    }

    pub fn with_user(self, user: &User) -> Self {
        self.with("user", UserView::from(user))
    }
}

impl Serialize for Page {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = self.locals.clone();
        map.insert("view".to_string(), Value::String(self.view.to_string()));
        map.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use serde_json::json;

    fn alice() -> User {
        NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "$2b$04$secret".to_string(),
            role: Role::Moderator,
        }
        .into_user()
    }

    #[test]
    fn page_serializes_flat_with_view_name() {
        let page = Page::new("pets/pet-details").with("isMod", true);
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value, json!({ "view": "pets/pet-details", "isMod": true }));
    }

    #[test]
    fn user_view_never_carries_the_password() {
        let value = serde_json::to_value(Page::new("user").with_user(&alice())).unwrap();
        assert_eq!(value["user"]["username"], "alice");
        assert_eq!(value["user"]["role"], "MODERATOR");
        assert!(value["user"].get("password").is_none());
    }
}
