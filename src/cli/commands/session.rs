use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config;
use crate::services::SessionService;

#[derive(Subcommand)]
pub enum SessionCommands {
    #[command(about = "Delete expired sessions")]
    Purge,
}

pub async fn handle(cmd: SessionCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SessionCommands::Purge => {
            let store = connect_store().await?;
            let sessions = SessionService::new(store.clone(), store, config::config().session.max_age_secs);
            let purged = sessions.purge_expired().await?;

            output_success(
                &output_format,
                &format!("Purged {} expired sessions", purged),
                Some(json!({ "purged": purged })),
            )
        }
    }
}
