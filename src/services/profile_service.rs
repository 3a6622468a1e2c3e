use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::ServiceError;
use super::ownership::OwnershipGuard;
use crate::auth;
use crate::database::models::{Address, Pet, PetData, User, UserChanges};
use crate::database::{PetRepository, UserRepository};

/// Pet form as posted by the new-pet and edit-pet pages. Address fields
/// arrive flat next to the pet's own fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PetForm {
    pub name: String,
    pub description: String,
    pub species: String,
    pub age: String,
    pub gender: String,
    pub profile_img: String,
    pub street: String,
    pub postal: String,
    pub number: String,
    pub country: String,
    pub city: String,
}

impl PetForm {
    pub fn into_data(self) -> Result<PetData, ServiceError> {
        let age = match self.age.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(age) if age >= 0 => Some(age),
                _ => return Err(ServiceError::validation("age", "Age must be a whole number of years.")),
            },
        };
        Ok(PetData {
            name: self.name.trim().to_string(),
            description: self.description,
            species: self.species,
            age,
            gender: self.gender,
            profile_img: self.profile_img,
            address: Address {
                street: self.street,
                postal: self.postal,
                number: self.number,
                country: self.country,
                city: self.city,
            },
        })
    }
}

/// Account form posted by the edit-profile page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Multi-step operations on a user and the pets they own. Steps run in
/// sequence against independent collections; nothing is rolled back.
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    pets: Arc<dyn PetRepository>,
    bcrypt_cost: u32,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, pets: Arc<dyn PetRepository>, bcrypt_cost: u32) -> Self {
        Self { users, pets, bcrypt_cost }
    }

    /// Canonical user plus their pets in list order.
    pub async fn profile(&self, user: &User) -> Result<(User, Vec<Pet>), ServiceError> {
        let user = self.reload(user.id).await?;
        let pets = self.pets.find_by_ids(&user.pets).await?;
        Ok((user, pets))
    }

    pub async fn add_pet(&self, user: &User, data: PetData) -> Result<User, ServiceError> {
        if data.name.trim().is_empty() {
            return Err(ServiceError::validation("name", "Please provide a name."));
        }

        let same_name = self.pets.find_by_name(&data.name).await?;
        if same_name.iter().any(|pet| user.pets.contains(&pet.id)) {
            return Err(ServiceError::duplicate("name", "You have already a pet with that name."));
        }

        let pet = self.pets.create(data).await?;
        if let Err(e) = self.users.append_pet(user.id, pet.id).await {
            warn!("Pet {} created but not linked to user {}: {}", pet.id, user.id, e);
            return Err(e.into());
        }

        info!("User {} added pet {} ({})", user.username, pet.id, pet.name);
        self.reload(user.id).await
    }

    /// Ownership-checked read of one of the user's pets.
    pub async fn owned_pet(&self, user: &User, pet_id: &str) -> Result<Pet, ServiceError> {
        let id = OwnershipGuard::owned_id(user, pet_id).ok_or_else(ServiceError::not_authorized_for_pet)?;
        self.pets
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Pet not found".to_string()))
    }

    pub async fn update_pet(&self, user: &User, pet_id: &str, data: PetData) -> Result<Pet, ServiceError> {
        let id = OwnershipGuard::owned_id(user, pet_id).ok_or_else(ServiceError::not_authorized_for_pet)?;
        if data.name.trim().is_empty() {
            return Err(ServiceError::validation("name", "Please provide a name."));
        }
        let pet = self.pets.update(id, data).await?;
        info!("User {} updated pet {}", user.username, pet.id);
        Ok(pet)
    }

    /// Unlinks the pet, then deletes it. A failed delete after a successful
    /// unlink leaves an orphaned pet and is only logged.
    pub async fn remove_pet(&self, user: &User, pet_id: &str) -> Result<User, ServiceError> {
        let id = OwnershipGuard::owned_id(user, pet_id).ok_or_else(ServiceError::not_authorized_for_pet)?;

        self.users.remove_pet(user.id, id).await?;
        match self.pets.delete_by_id(id).await {
            Ok(true) => info!("User {} removed pet {}", user.username, id),
            Ok(false) => warn!("Pet {} unlinked from user {} but was already gone", id, user.id),
            Err(e) => warn!("Pet {} unlinked from user {} but not deleted (orphaned): {}", id, user.id, e),
        }

        self.reload(user.id).await
    }

    /// Deletes the user's pets and the user record concurrently. Both are
    /// always attempted; any failure fails the operation.
    pub async fn delete_user(&self, user: &User) -> Result<(), ServiceError> {
        let (pets_result, user_result) =
            futures::join!(self.pets.delete_many(&user.pets), self.users.delete(user.id));

        match &pets_result {
            Ok(count) => info!("Deleted {} pets of user {}", count, user.id),
            Err(e) => warn!("Deleting pets of user {} failed: {}", user.id, e),
        }
        match &user_result {
            Ok(true) => info!("Deleted user {} ({})", user.id, user.username),
            Ok(false) => warn!("User {} was already gone", user.id),
            Err(e) => warn!("Deleting user {} failed: {}", user.id, e),
        }

        pets_result?;
        user_result?;
        Ok(())
    }

    /// Blank password keeps the current hash.
    pub async fn update_account(&self, user: &User, form: AccountForm) -> Result<User, ServiceError> {
        let username = form.username.trim().to_string();
        if username.is_empty() {
            return Err(ServiceError::validation("username", "Please provide your username."));
        }

        if let Some(found) = self.users.find_by_username(&username).await? {
            if found.id != user.id {
                return Err(ServiceError::duplicate("username", "Username already taken."));
            }
        }

        let password = if form.password.is_empty() {
            None
        } else {
            Some(auth::hash_password(form.password, self.bcrypt_cost).await?)
        };

        let updated = self
            .users
            .update(
                user.id,
                UserChanges {
                    username,
                    email: form.email.trim().to_string(),
                    password,
                },
            )
            .await?;
        info!("User {} updated their account", updated.id);
        Ok(updated)
    }

    async fn reload(&self, id: Uuid) -> Result<User, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }
}
