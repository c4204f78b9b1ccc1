use std::path::{Path, PathBuf};

use alloy::primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DeploymentError;

/// Where and when a contract instance was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub network: String,
    pub chain_id: u64,
    pub address: Address,
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub confirmations: u64,
    pub deployed_at: DateTime<Utc>,
}

impl DeploymentRecord {
    pub fn path(dir: impl AsRef<Path>, network: &str, contract_name: &str) -> PathBuf {
        dir.as_ref()
            .join(network)
            .join(format!("{}.json", contract_name))
    }

    /// Writes the record, replacing the one of an earlier deployment.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf, DeploymentError> {
        let path = Self::path(dir, &self.network, &self.contract_name);
        let failed = |reason: String| DeploymentError::Record {
            path: path.clone(),
            reason,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        std::fs::write(&path, json).map_err(|e| failed(e.to_string()))?;
        Ok(path)
    }

    /// All records of `network`, sorted by contract name. A network that was
    /// never deployed to has none.
    pub fn load_all(dir: impl AsRef<Path>, network: &str) -> std::io::Result<Vec<Self>> {
        let network_dir = dir.as_ref().join(network);
        if !network_dir.exists() {
            return Ok(vec![]);
        }
        let mut records = vec![];
        for entry in std::fs::read_dir(network_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let json = std::fs::read_to_string(&path)?;
            let record: DeploymentRecord = serde_json::from_str(&json)?;
            records.push(record);
        }
        records.sort_by(|a, b| a.contract_name.cmp(&b.contract_name));
        Ok(records)
    }
}
