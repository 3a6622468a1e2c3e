use uuid::Uuid;

use crate::config::ListingAccess;
use crate::database::models::User;

/// Ownership is membership of the pet id in the user's `pets` list; pets
/// carry no back-reference.
pub struct OwnershipGuard;

impl OwnershipGuard {
    /// True iff `pet_id` parses as an id and that id is in `user.pets`.
    pub fn is_owner(user: &User, pet_id: &str) -> bool {
        Self::owned_id(user, pet_id).is_some()
    }

    /// The parsed id when the user owns it.
    pub fn owned_id(user: &User, pet_id: &str) -> Option<Uuid> {
        let id = Uuid::parse_str(pet_id.trim()).ok()?;
        user.pets.contains(&id).then_some(id)
    }

    /// Whether `user` may browse the pet listing under the configured policy.
    pub fn can_list_pets(user: &User, access: ListingAccess) -> bool {
        match access {
            ListingAccess::Any => true,
            ListingAccess::Moderator => user.is_mod(),
        }
    }
}
