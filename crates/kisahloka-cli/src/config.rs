use clap::{Parser, Subcommand};

use crate::commands::{create_role::CreateRoleCmd, create_user::CreateUserCmd, migrate::MigrateCmd};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for kisahloka - prepares the catalog database and its administrative records."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Migrate(MigrateCmd),
    CreateRole(CreateRoleCmd),
    CreateUser(CreateUserCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Migrate(cmd) => cmd.run().await,
            Command::CreateRole(cmd) => cmd.run().await,
            Command::CreateUser(cmd) => cmd.run().await,
        }
    }
}
