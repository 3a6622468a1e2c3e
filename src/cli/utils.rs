use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::UserView;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::{DatabaseManager, PgStore};

/// Connects to the configured Postgres database. The admin CLI always works
/// against Postgres, whatever `DATABASE_BACKEND` says.
pub async fn connect_store() -> anyhow::Result<Arc<PgStore>> {
    let pool = DatabaseManager::connect(&config::config().database).await?;
    Ok(Arc::new(PgStore::new(pool)))
}

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// One row of the `user list` table.
pub fn user_row(user: &UserView) -> String {
    format!(
        "{:<38} {:<20} {:<10} {:<5} {}",
        user.id,
        user.username,
        user.role,
        user.pets.len(),
        user.email
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NewUser, Role};

    #[test]
    fn user_row_lists_pet_count_and_role() {
        let mut user = NewUser {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "hash".into(),
            role: Role::Admin,
        }
        .into_user();
        user.pets = vec![uuid::Uuid::new_v4(), uuid::Uuid::new_v4()];

        let row = user_row(&UserView::from(&user));
        assert!(row.contains("alice"));
        assert!(row.contains("ADMIN"));
        assert!(row.contains(" 2 "));
        assert!(row.ends_with("alice@example.com"));
    }
}
