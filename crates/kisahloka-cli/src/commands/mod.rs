pub mod create_role;
pub mod create_user;
pub mod migrate;

use kisahloka_types::config::BackendConfig;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

/// Opens the pool and brings the schema up to date
pub(crate) async fn open_database(backend: &BackendConfig) -> anyhow::Result<kisahloka_dal::Pool> {
    backend.ensure_data_dir().await?;
    let pool = kisahloka_dal::new_pool(&backend.database_url()).await?;
    kisahloka_dal::migrate(&pool).await?;
    Ok(pool)
}
