// handlers/public/home.rs - GET / handler

use crate::api::Page;
use crate::middleware::{ApiResponse, ApiResult};

pub async fn home_get() -> ApiResult<Page> {
    Ok(ApiResponse::success(
        Page::new("index")
            .with("name", env!("CARGO_PKG_NAME"))
            .with("version", env!("CARGO_PKG_VERSION")),
    ))
}
