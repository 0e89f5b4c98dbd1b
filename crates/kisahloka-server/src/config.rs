use crate::error::Result;
pub use clap::Parser;
use kisahloka_types::config::BackendConfig;
use url::Url;

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 4000,
        env = "KISAHLOKA_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "KISAHLOKA_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "KISAHLOKA_DEFAULT_PAGE_SIZE",
        default_value = "10",
        value_parser = clap::value_parser!(u64).range(1..=1000),
        help = "Page size used when request does not give valid one"
    )]
    pub default_page_size: u64,

    #[arg(long, env = "KISAHLOKA_CORS", help = "Enable permissive CORS")]
    pub cors: bool,

    #[command(flatten)]
    pub backend: BackendConfig,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn database_url(&self) -> String {
        self.backend.database_url()
    }

    /// URL of running server as seen from localhost
    pub fn base_url(&self) -> Result<Url> {
        let host = match self.listen_address.as_str() {
            "0.0.0.0" | "::" => "127.0.0.1",
            address => address,
        };
        let url = Url::parse(&format!("http://{}:{}/", host, self.port))?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["kisahloka-server", "--data-dir", "/tmp/k"])
            .unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.default_page_size, 10);
        assert!(!config.cors);
        assert_eq!(config.database_url(), "sqlite:///tmp/k/kisahloka.db");
        assert_eq!(config.base_url().unwrap().as_str(), "http://127.0.0.1:4000/");
    }

    #[test]
    fn test_page_size_range() {
        assert!(ServerConfig::try_parse_from([
            "kisahloka-server",
            "--default-page-size",
            "0"
        ])
        .is_err());
    }
}
