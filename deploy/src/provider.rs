use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::coins_bip39::{English, Mnemonic};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use coins_bip32::ecdsa::SigningKey;
use coins_bip32::xkeys::{Parent, XPriv};

use crate::deployer::{CreationReceipt, CreationRequest, DeployTransport};
use crate::error::{ConfigurationError, DeploymentError, NetworkError};
use crate::secret::Secret;

const ACCOUNT_PATH: &str = "m/44'/60'/0'/0";

/// Which accounts of the mnemonic the wallet unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletOptions {
    pub address_index: u32,
    pub num_addresses: u32,
}

impl Default for WalletOptions {
    fn default() -> Self {
        WalletOptions {
            address_index: 0,
            num_addresses: 100,
        }
    }
}

/// HTTP provider that signs with accounts derived from a mnemonic along
/// `m/44'/60'/0'/0/{index}`. The first derived account is the default signer.
#[derive(Clone)]
pub struct HdWalletProvider {
    provider: DynProvider,
    accounts: Vec<Address>,
    url: Url,
}

impl HdWalletProvider {
    pub fn new(
        secret: &Secret,
        url: Url,
        options: WalletOptions,
    ) -> Result<Self, ConfigurationError> {
        if options.num_addresses == 0 {
            return Err(ConfigurationError::NoAccounts);
        }
        let root = account_root(secret)?;
        let first = options.address_index;
        let last = first.saturating_add(options.num_addresses);
        let signers = (first..last)
            .map(|index| derive_signer(&root, index))
            .collect::<Result<Vec<_>, _>>()?;
        let accounts = signers.iter().map(|signer| signer.address()).collect();

        let mut signers = signers.into_iter();
        let default_signer = signers.next().ok_or(ConfigurationError::NoAccounts)?;
        let mut wallet = EthereumWallet::new(default_signer);
        for signer in signers {
            wallet.register_signer(signer);
        }
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(url.clone())
            .erased();
        Ok(HdWalletProvider {
            provider,
            accounts,
            url,
        })
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

fn invalid_mnemonic(e: impl std::fmt::Display) -> ConfigurationError {
    ConfigurationError::InvalidMnemonic {
        reason: e.to_string(),
    }
}

/// Extended key at `m/44'/60'/0'/0`. The seed is stretched from the phrase
/// once here; accounts are its non-hardened children.
fn account_root(secret: &Secret) -> Result<XPriv, ConfigurationError> {
    let mnemonic =
        Mnemonic::<English>::new_from_phrase(secret.phrase()).map_err(invalid_mnemonic)?;
    let seed = mnemonic.to_seed(None).map_err(invalid_mnemonic)?;
    XPriv::root_from_seed(&seed, None)
        .and_then(|root| root.derive_path(ACCOUNT_PATH))
        .map_err(invalid_mnemonic)
}

fn derive_signer(root: &XPriv, index: u32) -> Result<PrivateKeySigner, ConfigurationError> {
    let child = root.derive_child(index).map_err(invalid_mnemonic)?;
    let key: &SigningKey = child.as_ref();
    PrivateKeySigner::from_slice(&key.to_bytes()).map_err(invalid_mnemonic)
}

#[async_trait]
impl DeployTransport for HdWalletProvider {
    fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    async fn chain_id(&self) -> Result<u64, NetworkError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| NetworkError::rpc("eth_chainId", e))
    }

    async fn block_number(&self) -> Result<u64, NetworkError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| NetworkError::rpc("eth_blockNumber", e))
    }

    async fn dry_run(&self, request: &CreationRequest) -> Result<u64, DeploymentError> {
        let tx = request.to_transaction();
        self.provider
            .call(tx.clone())
            .await
            .map_err(|e| DeploymentError::DryRun(e.to_string()))?;
        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| DeploymentError::DryRun(e.to_string()))
    }

    async fn submit(&self, request: CreationRequest) -> Result<TxHash, DeploymentError> {
        let pending = self
            .provider
            .send_transaction(request.to_transaction())
            .await
            .map_err(|e| DeploymentError::Submission(e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<CreationReceipt>, NetworkError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| NetworkError::rpc("eth_getTransactionReceipt", e))?;
        Ok(receipt.and_then(|receipt| {
            let block_number = receipt.block_number()?;
            Some(CreationReceipt {
                block_number,
                contract_address: receipt.contract_address(),
                status: receipt.status(),
            })
        }))
    }
}
