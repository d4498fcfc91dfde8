use crate::cli::utils::*;
use crate::cli::OutputFormat;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let db = connect_database().await?;
    let result = db.migrate().await;
    db.close().await;

    match result {
        Ok(()) => output_success(&output_format, "Migrations applied", None),
        Err(e) => {
            output_error(&output_format, &e.to_string(), Some("MIGRATION_FAILED"))?;
            Err(e.into())
        }
    }
}
