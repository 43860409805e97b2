//! Entry point for the RGA replica simulation.
//!
//! Runs several replicas that edit one sequence concurrently while their
//! deltas travel over a network that reorders and duplicates them, then
//! checks that every replica converged.

use std::process::ExitCode;

use delta_rga::config::SimulationConfig;
use delta_rga::sim;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SimulationConfig::from_env();
    info!(
        replicas = config.replicas,
        edits = config.edits_per_replica,
        duplicate_rate = config.duplicate_rate,
        seed = config.seed,
        "Starting RGA replica simulation..."
    );

    match sim::run(config).await {
        Ok(report) => {
            info!(
                vertices = report.vertices,
                sent = report.network.sent,
                delivered = report.network.delivered,
                duplicated = report.network.duplicated,
                "Simulation finished"
            );
            info!("Converged text: {:?}", report.text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Simulation failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
