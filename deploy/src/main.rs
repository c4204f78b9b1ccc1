use token_deploy::deployer::MigrationRunner;
use token_deploy::migrations::{migrations, run_migrations};
use token_deploy::network::{NetworkResolver, Networks};
use token_deploy::shared::{config, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();
    let config = config();
    let networks = Networks::default();
    let profile = networks.resolve_profile(&config.network)?;
    let provider = NetworkResolver::new().build_provider(profile)?;
    info!(network = %profile.name, deployer = %profile.from, "deployer wallet ready");

    let runner = MigrationRunner::new(&provider, profile);
    let records = run_migrations(
        &runner,
        &migrations(),
        &config.artifacts_dir,
        &config.deployments_dir,
    )
    .await?;
    for record in &records {
        println!("{}: {} (tx {})", record.contract_name, record.address, record.transaction_hash);
    }
    Ok(())
}
