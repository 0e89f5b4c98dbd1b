pub mod rest;

use anyhow::{Result, anyhow};
use kisahloka_server::{
    build_state,
    config::{Parser, ServerConfig},
    run::run_graceful_with_state,
};
use rand::Rng as _;
use reqwest::Url;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tracing::{debug, error};

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(4030..5030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, std::time::Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

/// Keeps the temporary data directory alive and stops the server when dropped
pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

pub fn test_config(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix(format!("{}_", test_name))?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?.to_string();
    let args = &[
        "kisahloka-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
            shutdown: None,
        },
    ))
}

/// Starts server for the test and waits until it answers health checks
pub async fn prepare_env(test_name: &str) -> Result<(reqwest::Client, Url, ConfigGuard)> {
    let (args, mut guard) = test_config(test_name)?;
    let base_url = args.base_url()?;
    let state = build_state(&args).await?;
    let (tx, rx) = oneshot::channel::<()>();
    guard.shutdown = Some(tx);

    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        if let Err(e) = run_graceful_with_state(args, state, shutdown).await {
            error!("Test server failed: {e}");
        }
    });

    let client = reqwest::Client::new();
    let health_url = base_url.join("health")?;
    for _ in 0..50 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Test server ready at {base_url}");
                return Ok((client, base_url, guard));
            }
            _ => tokio::time::sleep(std::time::Duration::from_millis(100)).await,
        }
    }
    Err(anyhow!("Server at {base_url} did not start"))
}
