use std::fmt;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info};

use crate::artifact::ContractArtifact;
use crate::error::{ConfigurationError, DeploymentError, NetworkError, Result};
use crate::network::NetworkProfile;
use crate::record::DeploymentRecord;

/// BSC produces a block roughly every three seconds.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// The chain operations a deployment needs. Signing, nonces and gas pricing
/// are the implementor's business.
#[async_trait]
pub trait DeployTransport: Send + Sync {
    /// Accounts the transport can sign for.
    fn accounts(&self) -> &[Address];

    async fn chain_id(&self) -> core::result::Result<u64, NetworkError>;

    async fn block_number(&self) -> core::result::Result<u64, NetworkError>;

    /// Simulates the creation and returns its gas estimate.
    async fn dry_run(
        &self,
        request: &CreationRequest,
    ) -> core::result::Result<u64, DeploymentError>;

    async fn submit(
        &self,
        request: CreationRequest,
    ) -> core::result::Result<TxHash, DeploymentError>;

    /// `None` while the transaction is not mined.
    async fn receipt(
        &self,
        tx_hash: TxHash,
    ) -> core::result::Result<Option<CreationReceipt>, NetworkError>;
}

/// A contract-creation transaction before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationRequest {
    pub from: Address,
    pub chain_id: u64,
    /// Bytecode followed by the ABI-encoded constructor arguments.
    pub code: Bytes,
    /// The literals the constructor arguments were encoded from.
    pub constructor_args: Vec<String>,
    pub gas_limit: Option<u64>,
}

impl CreationRequest {
    pub fn to_transaction(&self) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .with_from(self.from)
            .with_chain_id(self.chain_id)
            .with_deploy_code(self.code.clone());
        if let Some(gas_limit) = self.gas_limit {
            tx.set_gas_limit(gas_limit);
        }
        tx
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationReceipt {
    pub block_number: u64,
    pub contract_address: Option<Address>,
    pub status: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentState {
    Pending,
    Confirmed,
    Failed,
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            DeploymentState::Pending => "pending",
            DeploymentState::Confirmed => "confirmed",
            DeploymentState::Failed => "failed",
        };
        f.write_str(state)
    }
}

struct Confirmed {
    address: Address,
    block_number: u64,
    confirmations: u64,
}

/// Deploys contracts through a transport bound to one network profile.
pub struct MigrationRunner<'a, T> {
    transport: &'a T,
    profile: &'a NetworkProfile,
    poll_interval: Duration,
}

impl<'a, T: DeployTransport> MigrationRunner<'a, T> {
    pub fn new(transport: &'a T, profile: &'a NetworkProfile) -> Self {
        MigrationRunner {
            transport,
            profile,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn profile(&self) -> &NetworkProfile {
        self.profile
    }

    /// Creates one new instance of `artifact`. Every call deploys a fresh
    /// contract; nothing checks for an earlier deployment.
    pub async fn deploy(
        &self,
        artifact: &ContractArtifact,
        constructor_args: &[String],
    ) -> Result<DeploymentRecord> {
        let profile = self.profile;
        let chain_id = self.transport.chain_id().await?;
        if chain_id != profile.network_id {
            return Err(NetworkError::ChainIdMismatch {
                expected: profile.network_id,
                actual: chain_id,
            }
            .into());
        }
        if !self.transport.accounts().contains(&profile.from) {
            return Err(ConfigurationError::UnknownSender(profile.from).into());
        }

        let mut request = CreationRequest {
            from: profile.from,
            chain_id,
            code: artifact.encode_deployment(constructor_args)?,
            constructor_args: constructor_args.to_vec(),
            gas_limit: None,
        };
        if profile.skip_dry_run {
            debug!(target: "deployer", contract = %artifact.contract_name, "skipping dry run");
        } else {
            let gas = self.transport.dry_run(&request).await?;
            debug!(
                target: "deployer",
                contract = %artifact.contract_name,
                gas,
                "dry run succeeded"
            );
            request.gas_limit = Some(gas);
        }

        info!(
            target: "deployer",
            contract = %artifact.contract_name,
            network = %profile.name,
            from = %profile.from,
            "deploying contract"
        );
        let start_block = self.transport.block_number().await?;
        let tx_hash = self.transport.submit(request).await?;
        info!(
            target: "deployer",
            %tx_hash,
            state = %DeploymentState::Pending,
            "creation transaction sent"
        );

        match self.await_confirmations(tx_hash, start_block).await {
            Ok(confirmed) => {
                info!(
                    target: "deployer",
                    %tx_hash,
                    address = %confirmed.address,
                    block_number = confirmed.block_number,
                    confirmations = confirmed.confirmations,
                    state = %DeploymentState::Confirmed,
                    "contract deployed"
                );
                Ok(DeploymentRecord {
                    contract_name: artifact.contract_name.clone(),
                    network: profile.name.clone(),
                    chain_id,
                    address: confirmed.address,
                    transaction_hash: tx_hash,
                    block_number: confirmed.block_number,
                    confirmations: confirmed.confirmations,
                    deployed_at: Utc::now(),
                })
            }
            Err(e) => {
                error!(
                    target: "deployer",
                    %tx_hash,
                    state = %DeploymentState::Failed,
                    error = %e,
                    "deployment failed"
                );
                Err(e)
            }
        }
    }

    async fn await_confirmations(&self, tx_hash: TxHash, start_block: u64) -> Result<Confirmed> {
        let required = self.profile.confirmations;
        loop {
            let head = self.transport.block_number().await?;
            let mut confirmations = 0;
            if let Some(receipt) = self.transport.receipt(tx_hash).await? {
                if !receipt.status {
                    return Err(DeploymentError::Reverted {
                        tx_hash,
                        block_number: receipt.block_number,
                    }
                    .into());
                }
                confirmations = head.saturating_sub(receipt.block_number);
                if confirmations >= required {
                    let address = receipt
                        .contract_address
                        .ok_or(DeploymentError::MissingContractAddress(tx_hash))?;
                    return Ok(Confirmed {
                        address,
                        block_number: receipt.block_number,
                        confirmations,
                    });
                }
                debug!(
                    target: "deployer",
                    %tx_hash,
                    confirmations,
                    required,
                    "waiting for confirmations"
                );
            }
            if head.saturating_sub(start_block) >= self.profile.timeout_blocks {
                return Err(DeploymentError::Timeout {
                    tx_hash,
                    timeout_blocks: self.profile.timeout_blocks,
                    confirmations,
                }
                .into());
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
