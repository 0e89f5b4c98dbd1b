use clap::Parser;
use kisahloka_dal::user::{CreateUser, UserRepository};
use kisahloka_types::{
    config::BackendConfig,
    general::{Gender, ValidEmail},
};
use time::{macros::format_description, Date};

use crate::commands::{open_database, Executor};

fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

#[derive(Parser, Debug)]
pub struct CreateUserCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(short, long, help = "External user id from the identity provider")]
    uid: String,
    #[arg(short, long, help = "User email")]
    email: ValidEmail,
    #[arg(short, long, help = "User name")]
    name: String,
    #[arg(short, long, help = "Id of existing role")]
    role_id: i64,
    #[arg(long, help = "Birth date as YYYY-MM-DD", value_parser = parse_date)]
    birth_date: Option<Date>,
    #[arg(short, long, help = "male or female")]
    gender: Option<Gender>,
}

impl Executor for CreateUserCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = open_database(&self.backend).await?;
        let repository = UserRepository::new(pool.clone());
        let new_user = CreateUser {
            uid: self.uid,
            role_id: self.role_id,
            email: self.email,
            name: self.name,
            birth_date: self.birth_date,
            gender: self.gender,
        };
        let created = repository.create(new_user).await?;
        println!("{}", created.id);
        pool.close().await;
        Ok(())
    }
}
