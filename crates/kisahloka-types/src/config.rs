use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
pub struct BackendConfig {
    #[arg(
        long,
        env = "KISAHLOKA_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/kisahloka.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "KISAHLOKA_DATA_DIR",
        help = "Data directory (database, logs etc.), default is system default like ~/.local/share/kisahloka",
        default_value_t = default_data_dir()
    )]
    data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("kisahloka"))
        .unwrap_or_else(|| PathBuf::from("kisahloka"))
        .to_string_lossy()
        .to_string()
}

impl BackendConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/kisahloka.db", self.data_dir))
    }

    /// Creates data directory if missing
    pub async fn ensure_data_dir(&self) -> anyhow::Result<PathBuf> {
        let dir = self.data_dir();
        if !tokio::fs::try_exists(&dir).await? {
            tokio::fs::create_dir_all(&dir).await?;
        } else if !dir.is_dir() {
            anyhow::bail!("Data directory {} is not a directory", dir.display());
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_url() {
        let config =
            BackendConfig::try_parse_from(["kisahloka", "--data-dir", "/tmp/kisah"]).unwrap();
        assert_eq!(config.database_url(), "sqlite:///tmp/kisah/kisahloka.db");
    }

    #[test]
    fn test_explicit_database_url() {
        let config = BackendConfig::try_parse_from([
            "kisahloka",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(config.database_url(), "sqlite::memory:");
    }

    #[tokio::test]
    async fn test_ensure_data_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let dir_arg = dir.to_string_lossy().to_string();
        let config = BackendConfig::try_parse_from(["kisahloka", "--data-dir", &dir_arg]).unwrap();
        let created = config.ensure_data_dir().await.unwrap();
        assert!(created.is_dir());
    }
}
