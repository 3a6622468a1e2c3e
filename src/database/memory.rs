//! In-process store used by the `memory` backend and by tests.
//!
//! Each collection sits behind its own `RwLock`; every operation takes the
//! lock once, so set-append and set-remove on `User.pets` are atomic here the
//! same way they are in Postgres.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{NewUser, Pet, PetData, Role, SessionRecord, SessionUser, User, UserChanges};
use crate::database::repository::{HealthCheck, PetRepository, RepoError, SessionStore, UserRepository};
use crate::filter::{DirectFilter, PetQuery};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    pets: RwLock<Vec<Pet>>,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PetRepository for MemoryStore {
    async fn find_by_filter(&self, filter: &DirectFilter) -> Result<Vec<Pet>, RepoError> {
        let pets = self.pets.read().await;
        Ok(pets
            .iter()
            .filter(|pet| PetQuery::matches_direct(filter, pet))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pet>, RepoError> {
        let pets = self.pets.read().await;
        Ok(pets.iter().find(|pet| pet.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Pet>, RepoError> {
        let pets = self.pets.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| pets.iter().find(|pet| pet.id == *id).cloned())
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Pet>, RepoError> {
        let pets = self.pets.read().await;
        Ok(pets.iter().filter(|pet| pet.name == name).cloned().collect())
    }

    async fn create(&self, data: PetData) -> Result<Pet, RepoError> {
        let pet = data.into_pet();
        self.pets.write().await.push(pet.clone());
        Ok(pet)
    }

    async fn update(&self, id: Uuid, data: PetData) -> Result<Pet, RepoError> {
        let mut pets = self.pets.write().await;
        let pet = pets
            .iter_mut()
            .find(|pet| pet.id == id)
            .ok_or_else(|| RepoError::NotFound(format!("pet {}", id)))?;
        pet.name = data.name;
        pet.description = data.description;
        pet.species = data.species;
        pet.age = data.age;
        pet.gender = data.gender;
        pet.profile_img = data.profile_img;
        pet.address = data.address;
        pet.updated_at = Utc::now();
        Ok(pet.clone())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        let mut pets = self.pets.write().await;
        let before = pets.len();
        pets.retain(|pet| !ids.contains(&pet.id));
        Ok((before - pets.len()) as u64)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut pets = self.pets.write().await;
        let before = pets.len();
        pets.retain(|pet| pet.id != id);
        Ok(pets.len() < before)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::UniqueViolation { field: "username".to_string() });
        }
        let user = user.into_user();
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.users.read().await.clone())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id != id && u.username == changes.username) {
            return Err(RepoError::UniqueViolation { field: "username".to_string() });
        }
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| RepoError::NotFound(format!("user {}", id)))?;
        user.username = changes.username;
        user.email = changes.email;
        if let Some(password) = changes.password {
            user.password = password;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| RepoError::NotFound(format!("user {}", id)))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn append_pet(&self, user_id: Uuid, pet_id: Uuid) -> Result<(), RepoError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| RepoError::NotFound(format!("user {}", user_id)))?;
        if !user.pets.contains(&pet_id) {
            user.pets.push(pet_id);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn remove_pet(&self, user_id: Uuid, pet_id: Uuid) -> Result<(), RepoError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| RepoError::NotFound(format!("user {}", user_id)))?;
        if let Some(index) = user.pets.iter().position(|id| *id == pet_id) {
            user.pets.remove(index);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, session: SessionRecord) -> Result<(), RepoError> {
        self.sessions
            .write()
            .await
            .insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<SessionRecord>, RepoError> {
        Ok(self.sessions.read().await.get(token_hash).cloned())
    }

    async fn refresh(&self, token_hash: &str, user: SessionUser, expires_at: DateTime<Utc>) -> Result<(), RepoError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(token_hash)
            .ok_or_else(|| RepoError::NotFound("session".to_string()))?;
        session.user = user;
        session.expires_at = expires_at;
        Ok(())
    }

    async fn delete(&self, token_hash: &str) -> Result<(), RepoError> {
        self.sessions.write().await.remove(token_hash);
        Ok(())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.user.id != user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
