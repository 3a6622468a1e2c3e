// handlers/protected/profile/show.rs - GET /profile handler

use axum::extract::{Extension, State};

use crate::api::{Page, ProfileView};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

pub async fn profile_show(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Page> {
    let (user, pets) = state.profile_service().profile(&current.user).await?;

    Ok(ApiResponse::success(
        Page::new("user")
            .with("user", ProfileView::new(&user, pets))
            .with("isMod", user.is_mod()),
    ))
}
