// handlers/protected/pets/list.rs - GET /pets handler

use axum::extract::{Extension, Query, State};
use std::collections::HashMap;

use crate::api::Page;
use crate::error::ApiError;
use crate::filter::PetQueryPlanner;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::OwnershipGuard;
use crate::state::AppState;

/**
 * GET /pets - List pets matching the query string
 *
 * Every non-empty query parameter is an equality filter. Address keys
 * (`street`, `postal`, `number`, `country`, `city`) match inside the pet's
 * address; all other keys match top-level pet fields. Unknown keys match
 * nothing.
 *
 * Example: `/pets?species=cat&city=Lima`
 */
pub async fn pets_list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Page> {
    if !OwnershipGuard::can_list_pets(&current.user, state.config.pets.listing_access) {
        return Err(ApiError::forbidden("Only moderators can browse all pets"));
    }

    let pets = PetQueryPlanner::new(state.pets.as_ref()).filter(params).await?;

    Ok(ApiResponse::success(
        Page::new("pets")
            .with_user(&current.user)
            .with("pets", pets),
    ))
}
