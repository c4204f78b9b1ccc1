use std::path::PathBuf;

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use crate::network::TESTNET;

#[derive(Debug, Clone)]
pub struct Config {
    pub network: String,
    pub artifacts_dir: PathBuf,
    pub deployments_dir: PathBuf,
}

/// Reads the environment, after loading `.env` when there is one.
pub fn config() -> Config {
    dotenv().ok();
    Config {
        network: env_or("DEPLOY_NETWORK", TESTNET),
        artifacts_dir: env_or("ARTIFACTS_DIR", "build/contracts").into(),
        deployments_dir: env_or("DEPLOYMENTS_DIR", "deployments").into(),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
