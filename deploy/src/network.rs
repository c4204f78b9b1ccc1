use std::collections::HashMap;
use std::path::PathBuf;

use alloy::primitives::{address, Address};
use alloy::transports::http::reqwest::Url;
use maplit::hashmap;
use tracing::debug;

use crate::error::ConfigurationError;
use crate::provider::{HdWalletProvider, WalletOptions};
use crate::secret::{Secret, SECRET_PATH};

pub const TESTNET: &str = "testnet";
pub const TESTNET_URL: &str = "https://data-seed-prebsc-1-s1.binance.org:8545/";
pub const TESTNET_NETWORK_ID: u64 = 97;

/// Default sender for every transaction sent during migrations.
pub const TESTNET_FROM: Address = address!("D8f3234C711Dd16ee0d881659d6502161999806d");

/// Connection parameters of a named network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: String,
    pub url: String,
    pub network_id: u64,
    /// Blocks that must be mined on top of the deployment block.
    pub confirmations: u64,
    pub from: Address,
    /// Upper bound, in blocks since submission, on waiting for confirmations.
    pub timeout_blocks: u64,
    pub skip_dry_run: bool,
}

impl NetworkProfile {
    pub fn testnet() -> Self {
        NetworkProfile {
            name: TESTNET.to_string(),
            url: TESTNET_URL.to_string(),
            network_id: TESTNET_NETWORK_ID,
            confirmations: 10,
            from: TESTNET_FROM,
            timeout_blocks: 200,
            skip_dry_run: true,
        }
    }

    pub fn endpoint(&self) -> Result<Url, ConfigurationError> {
        self.url
            .parse::<Url>()
            .map_err(|e| ConfigurationError::InvalidEndpoint {
                url: self.url.clone(),
                reason: e.to_string(),
            })
    }
}

/// The set of networks migrations can target, keyed by name.
#[derive(Debug, Clone)]
pub struct Networks {
    profiles: HashMap<String, NetworkProfile>,
}

impl Networks {
    pub fn new(profiles: impl IntoIterator<Item = NetworkProfile>) -> Self {
        Networks {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.name.clone(), profile))
                .collect(),
        }
    }

    pub fn resolve_profile(&self, name: &str) -> Result<&NetworkProfile, ConfigurationError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownNetwork(name.to_string()))
    }
}

impl Default for Networks {
    fn default() -> Self {
        Networks {
            profiles: hashmap! {
                TESTNET.to_string() => NetworkProfile::testnet(),
            },
        }
    }
}

/// Turns a network profile into a signing provider.
///
/// Nothing is read or derived until [`NetworkResolver::build_provider`] is
/// called, and building the provider performs no network I/O.
#[derive(Debug, Clone)]
pub struct NetworkResolver {
    secret_path: PathBuf,
    wallet: WalletOptions,
}

impl NetworkResolver {
    pub fn new() -> Self {
        NetworkResolver {
            secret_path: PathBuf::from(SECRET_PATH),
            wallet: WalletOptions::default(),
        }
    }

    pub fn with_secret_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.secret_path = path.into();
        self
    }

    pub fn with_wallet_options(mut self, wallet: WalletOptions) -> Self {
        self.wallet = wallet;
        self
    }

    pub fn build_provider(
        &self,
        profile: &NetworkProfile,
    ) -> Result<HdWalletProvider, ConfigurationError> {
        let url = profile.endpoint()?;
        let secret = Secret::read(&self.secret_path)?;
        debug!(
            target: "network",
            network = %profile.name,
            address_index = self.wallet.address_index,
            num_addresses = self.wallet.num_addresses,
            "deriving deployer wallet"
        );
        HdWalletProvider::new(&secret, url, self.wallet)
    }
}

impl Default for NetworkResolver {
    fn default() -> Self {
        Self::new()
    }
}
