use clap::Parser;
use kisahloka_types::config::BackendConfig;
use tracing::info;

use crate::commands::{open_database, Executor};

#[derive(Parser, Debug)]
pub struct MigrateCmd {
    #[command(flatten)]
    backend: BackendConfig,
}

impl Executor for MigrateCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = open_database(&self.backend).await?;
        info!("Database {} migrated", self.backend.database_url());
        pool.close().await;
        Ok(())
    }
}
