use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use rand::Rng;
use token_deploy::artifact::ContractArtifact;
use token_deploy::deployer::{CreationReceipt, CreationRequest, DeployTransport};
use token_deploy::network::NetworkProfile;
use token_deploy::{DeploymentError, NetworkError};

pub const PHRASE: &str = "test test test test test test test test test test test junk";
pub const FIRST_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const LOCAL_CHAIN_ID: u64 = 1337;
pub const DRY_RUN_GAS: u64 = 1_234_567;

pub const TEST_TOKEN_JSON: &str = r#"{
    "contractName": "TestToken",
    "abi": [
        {
            "type": "constructor",
            "inputs": [{ "name": "owner", "type": "address", "internalType": "address" }],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "totalSupply",
            "inputs": [],
            "outputs": [{ "name": "", "type": "uint256", "internalType": "uint256" }],
            "stateMutability": "view"
        }
    ],
    "bytecode": "0x608060405234801561001057600080fd5b50"
}"#;

pub fn test_token() -> ContractArtifact {
    ContractArtifact::from_json(TEST_TOKEN_JSON).unwrap()
}

pub fn write_artifacts(dir: &Path) {
    std::fs::write(ContractArtifact::path(dir, "TestToken"), TEST_TOKEN_JSON).unwrap();
}

pub fn write_secret(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

pub fn deployer() -> Address {
    Address::repeat_byte(0xd8)
}

/// A profile for the mock chain with `confirmations` and `timeout_blocks` set.
pub fn profile(confirmations: u64, timeout_blocks: u64, skip_dry_run: bool) -> NetworkProfile {
    NetworkProfile {
        name: "local".to_string(),
        url: "http://localhost:8545".to_string(),
        network_id: LOCAL_CHAIN_ID,
        confirmations,
        from: deployer(),
        timeout_blocks,
        skip_dry_run,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Revert,
    NeverMined,
    /// Mined and successful, but the receipt names no created contract.
    NoContractAddress,
}

struct Pending {
    mined_at: u64,
    address: Address,
}

#[derive(Default)]
struct ChainState {
    head: u64,
    nonces: HashMap<Address, u64>,
    pending: HashMap<TxHash, Pending>,
    dry_runs: Vec<CreationRequest>,
    submitted: Vec<CreationRequest>,
    heads_seen: Vec<u64>,
    chain_id_calls: usize,
    tx_hashes: Vec<TxHash>,
}

/// In-memory chain. Every `block_number` call mines one block, and a
/// submitted transaction lands in the block after the current head.
pub struct MockTransport {
    chain_id: u64,
    accounts: Vec<Address>,
    outcome: Outcome,
    fail_dry_run: bool,
    fail_rpc: bool,
    state: Mutex<ChainState>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            chain_id: LOCAL_CHAIN_ID,
            accounts: vec![deployer()],
            outcome: Outcome::Success,
            fail_dry_run: false,
            fail_rpc: false,
            state: Mutex::new(ChainState::default()),
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn failing_dry_run(mut self) -> Self {
        self.fail_dry_run = true;
        self
    }

    /// The endpoint refuses every read, as an unreachable node would.
    pub fn failing_rpc(mut self) -> Self {
        self.fail_rpc = true;
        self
    }

    pub fn chain_id_calls(&self) -> usize {
        self.state.lock().unwrap().chain_id_calls
    }

    pub fn dry_runs(&self) -> Vec<CreationRequest> {
        self.state.lock().unwrap().dry_runs.clone()
    }

    pub fn submitted(&self) -> Vec<CreationRequest> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn tx_hashes(&self) -> Vec<TxHash> {
        self.state.lock().unwrap().tx_hashes.clone()
    }

    pub fn mined_at(&self, tx_hash: TxHash) -> Option<u64> {
        self.state.lock().unwrap().pending.get(&tx_hash).map(|p| p.mined_at)
    }

    pub fn heads_seen(&self) -> Vec<u64> {
        self.state.lock().unwrap().heads_seen.clone()
    }
}

#[async_trait]
impl DeployTransport for MockTransport {
    fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    async fn chain_id(&self) -> Result<u64, NetworkError> {
        self.state.lock().unwrap().chain_id_calls += 1;
        if self.fail_rpc {
            return Err(NetworkError::rpc("eth_chainId", "connection refused"));
        }
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> Result<u64, NetworkError> {
        if self.fail_rpc {
            return Err(NetworkError::rpc("eth_blockNumber", "connection refused"));
        }
        let mut state = self.state.lock().unwrap();
        state.head += 1;
        let head = state.head;
        state.heads_seen.push(head);
        Ok(head)
    }

    async fn dry_run(&self, request: &CreationRequest) -> Result<u64, DeploymentError> {
        self.state.lock().unwrap().dry_runs.push(request.clone());
        if self.fail_dry_run {
            return Err(DeploymentError::DryRun("execution reverted".to_string()));
        }
        Ok(DRY_RUN_GAS)
    }

    async fn submit(&self, request: CreationRequest) -> Result<TxHash, DeploymentError> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        let nonce = state.nonces.entry(request.from).or_default();
        let address = request.from.create(*nonce);
        *nonce += 1;
        let tx_hash = TxHash::from(rand::thread_rng().gen::<[u8; 32]>());
        let mined_at = match self.outcome {
            Outcome::NeverMined => u64::MAX,
            _ => state.head + 1,
        };
        state.pending.insert(tx_hash, Pending { mined_at, address });
        state.submitted.push(request);
        state.tx_hashes.push(tx_hash);
        Ok(tx_hash)
    }

    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<CreationReceipt>, NetworkError> {
        let state = self.state.lock().unwrap();
        let pending = state
            .pending
            .get(&tx_hash)
            .ok_or_else(|| {
                NetworkError::rpc("eth_getTransactionReceipt", "unknown transaction")
            })?;
        if pending.mined_at > state.head {
            return Ok(None);
        }
        Ok(Some(CreationReceipt {
            block_number: pending.mined_at,
            contract_address: match self.outcome {
                Outcome::NoContractAddress => None,
                _ => Some(pending.address),
            },
            status: self.outcome != Outcome::Revert,
        }))
    }
}
