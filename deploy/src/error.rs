use std::path::PathBuf;

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
}

/// Problems with local inputs. Raised before anything is sent to the network.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read secret file {path}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("secret file {path} is empty")]
    SecretEmpty { path: PathBuf },
    #[error("secret is not a valid mnemonic: {reason}")]
    InvalidMnemonic { reason: String },
    #[error("wallet must derive at least one account")]
    NoAccounts,
    #[error("unknown network `{0}`")]
    UnknownNetwork(String),
    #[error("invalid endpoint url `{url}`: {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("sender {0} is not one of the wallet's derived accounts")]
    UnknownSender(Address),
    #[error("invalid artifact {path}: {reason}")]
    Artifact { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("rpc call {method} failed: {message}")]
    Rpc {
        method: &'static str,
        message: String,
    },
    #[error("network id mismatch: profile expects {expected}, endpoint reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },
}

impl NetworkError {
    pub fn rpc(method: &'static str, err: impl std::fmt::Display) -> Self {
        NetworkError::Rpc {
            method,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("constructor arguments rejected for {contract}: {reason}")]
    ConstructorArgs { contract: String, reason: String },
    #[error("dry run failed: {0}")]
    DryRun(String),
    #[error("failed to submit creation transaction: {0}")]
    Submission(String),
    #[error("transaction {tx_hash} reverted in block {block_number}")]
    Reverted { tx_hash: TxHash, block_number: u64 },
    #[error("receipt of {0} carries no contract address")]
    MissingContractAddress(TxHash),
    #[error("{tx_hash} unconfirmed after {timeout_blocks} blocks ({confirmations} confirmations)")]
    Timeout {
        tx_hash: TxHash,
        timeout_blocks: u64,
        confirmations: u64,
    },
    #[error("failed to write deployment record {path}: {reason}")]
    Record { path: PathBuf, reason: String },
}
