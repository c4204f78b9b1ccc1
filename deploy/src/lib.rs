//! Deploys the TestToken contract to BSC testnet from a mnemonic-derived
//! wallet and waits for the configured confirmation depth.

pub mod artifact;
pub mod deployer;
pub mod error;
pub mod migrations;
pub mod network;
pub mod provider;
pub mod record;
pub mod secret;
pub mod shared;

pub use error::{ConfigurationError, DeploymentError, Error, NetworkError, Result};
