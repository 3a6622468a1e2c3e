use anyhow::{anyhow, Context};
use clap::Subcommand;
use serde_json::json;

use crate::api::UserView;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::models::Role;
use crate::database::UserRepository;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List all users")]
    List,

    #[command(about = "Show one user")]
    Show {
        #[arg(help = "Username")]
        username: String,
    },

    #[command(about = "Change a user's role")]
    Role {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "USER, MODERATOR or ADMIN")]
        role: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect_store().await?;

    match cmd {
        UserCommands::List => {
            let users: Vec<UserView> = store.list().await?.iter().map(UserView::from).collect();
            if users.is_empty() {
                return output_empty_collection(&output_format, "users", "No users registered");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?);
                }
                OutputFormat::Text => {
                    println!("{:<38} {:<20} {:<10} {:<5} {}", "ID", "USERNAME", "ROLE", "PETS", "EMAIL");
                    println!("{}", "-".repeat(90));
                    for user in &users {
                        println!("{}", user_row(user));
                    }
                }
            }
            Ok(())
        }
        UserCommands::Show { username } => {
            let user = store
                .find_by_username(&username)
                .await?
                .ok_or_else(|| anyhow!("User '{}' not found", username))?;
            let view = UserView::from(&user);

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "user": view }))?);
                }
                OutputFormat::Text => {
                    println!("ID:       {}", view.id);
                    println!("Username: {}", view.username);
                    println!("Email:    {}", view.email);
                    println!("Role:     {}", view.role);
                    println!("Pets:     {}", view.pets.len());
                    println!("Created:  {}", user.created_at.format("%Y-%m-%d %H:%M"));
                }
            }
            Ok(())
        }
        UserCommands::Role { username, role } => {
            let role: Role = role.parse().map_err(|e: String| anyhow!(e))?;
            let user = store
                .find_by_username(&username)
                .await?
                .ok_or_else(|| anyhow!("User '{}' not found", username))?;
            let updated = store
                .set_role(user.id, role)
                .await
                .with_context(|| format!("failed to update role of '{}'", username))?;

            output_success(
                &output_format,
                &format!("User '{}' is now {}", updated.username, updated.role),
                Some(json!({ "user": UserView::from(&updated) })),
            )
        }
    }
}
