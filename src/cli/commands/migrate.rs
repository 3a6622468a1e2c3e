use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::schema;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect_store().await?;
    schema::migrate(store.pool()).await?;
    output_success(&output_format, "Schema is up to date", None)
}
