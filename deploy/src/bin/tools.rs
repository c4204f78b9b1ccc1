use alloy::providers::{Provider, ProviderBuilder};
use eyre::bail;
use token_deploy::network::Networks;
use token_deploy::record::DeploymentRecord;
use token_deploy::shared::{config, init_tracing};
use tracing::{info, warn};

/// Checks that every recorded deployment of the configured network still has
/// code on chain.
#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();
    let config = config();
    let networks = Networks::default();
    let profile = networks.resolve_profile(&config.network)?;
    let records = DeploymentRecord::load_all(&config.deployments_dir, &profile.name)?;
    if records.is_empty() {
        warn!(network = %profile.name, "no deployments recorded");
        return Ok(());
    }

    let provider = ProviderBuilder::new().connect_http(profile.endpoint()?);
    let mut missing = 0;
    for record in &records {
        let code = provider.get_code_at(record.address).await?;
        if code.is_empty() {
            warn!(
                contract = %record.contract_name,
                address = %record.address,
                "no code at recorded address"
            );
            missing += 1;
        } else {
            info!(
                contract = %record.contract_name,
                address = %record.address,
                block_number = record.block_number,
                code_size = code.len(),
                "deployment present"
            );
        }
    }
    if missing > 0 {
        bail!("{} of {} recorded deployments have no code", missing, records.len());
    }
    Ok(())
}
