use std::path::Path;

use tracing::{error, info};

use crate::artifact::ContractArtifact;
use crate::deployer::{DeployTransport, MigrationRunner};
use crate::error::Result;
use crate::record::DeploymentRecord;

/// Owner handed to the TestToken constructor. Happens to equal the testnet
/// sender; the two are kept apart on purpose.
pub const TEST_TOKEN_OWNER: &str = "0xD8f3234C711Dd16ee0d881659d6502161999806d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub id: u32,
    pub name: &'static str,
    pub contract: &'static str,
    pub constructor_args: Vec<String>,
}

impl Migration {
    pub fn label(&self) -> String {
        format!("{}_{}", self.id, self.name)
    }
}

pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: 1,
        name: "axia_deploy",
        contract: "TestToken",
        constructor_args: vec![TEST_TOKEN_OWNER.to_string()],
    }]
}

/// Runs `migrations` in order, recording each deployment as soon as it is
/// confirmed. Stops at the first failure.
pub async fn run_migrations<T: DeployTransport>(
    runner: &MigrationRunner<'_, T>,
    migrations: &[Migration],
    artifacts_dir: &Path,
    deployments_dir: &Path,
) -> Result<Vec<DeploymentRecord>> {
    let mut records = Vec::with_capacity(migrations.len());
    for migration in migrations {
        info!(
            target: "migrations",
            migration = %migration.label(),
            network = %runner.profile().name,
            "running migration"
        );
        let artifact = ContractArtifact::load(artifacts_dir, migration.contract)?;
        let record = runner.deploy(&artifact, &migration.constructor_args).await?;
        let path = record.save(deployments_dir).inspect_err(|e| {
            error!(
                target: "migrations",
                migration = %migration.label(),
                contract = %record.contract_name,
                address = %record.address,
                tx_hash = %record.transaction_hash,
                error = %e,
                "contract deployed but its record was not written"
            );
        })?;
        info!(
            target: "migrations",
            migration = %migration.label(),
            path = %path.display(),
            "deployment recorded"
        );
        records.push(record);
    }
    Ok(records)
}
