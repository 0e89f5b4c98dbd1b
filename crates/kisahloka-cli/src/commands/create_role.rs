use clap::Parser;
use kisahloka_dal::role::{CreateRole, RoleRepository};
use kisahloka_types::config::BackendConfig;

use crate::commands::{open_database, Executor};

#[derive(Parser, Debug)]
pub struct CreateRoleCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(short, long, help = "Role name, stored as given")]
    name: String,
}

impl Executor for CreateRoleCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = open_database(&self.backend).await?;
        let repository = RoleRepository::new(pool.clone());
        let created = repository
            .create(CreateRole {
                role_name: self.name,
            })
            .await?;
        println!("{}", created.id);
        pool.close().await;
        Ok(())
    }
}
