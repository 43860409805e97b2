//! Multi-replica simulation.
//!
//! Spawns one editing task and one receiving task per replica, connects them
//! through a [`network::Network`] that shuffles and duplicates deltas, and
//! checks that every replica ends up with the same state.

pub mod network;
pub mod peer;

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::SimulationConfig;
use crate::crdt::{ReplicaId, Rga, RgaError};
use network::{Network, NetworkStats};
use peer::Peer;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Rga(#[from] RgaError),

    #[error("delta encoding: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("network channel closed while replicas were still sending")]
    ChannelClosed,

    #[error("replica task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("replica {replica} diverged: expected {expected:?}, found {found:?}")]
    Diverged {
        replica: ReplicaId,
        expected: String,
        found: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimReport {
    /// The text every replica converged to
    pub text: String,
    /// Vertices in the converged state, tombstones included
    pub vertices: usize,
    pub network: NetworkStats,
}

pub async fn run(config: SimulationConfig) -> Result<SimReport, SimError> {
    let replicas: Vec<Arc<Rga<char>>> = (1..=config.replicas as ReplicaId)
        .map(|id| Arc::new(Rga::new(id)))
        .collect();

    let (outbound, inbound) = mpsc::unbounded_channel();
    let mut inboxes = BTreeMap::new();
    let mut receivers = Vec::new();
    let mut editors = Vec::new();
    for replica in &replicas {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        inboxes.insert(replica.replica_id(), inbox_tx);
        receivers.push(tokio::spawn(peer::receive(Arc::clone(replica), inbox_rx)));

        let rng = StdRng::seed_from_u64(config.seed.wrapping_add(replica.replica_id()));
        let peer = Peer::new(Arc::clone(replica), outbound.clone());
        editors.push(tokio::spawn(peer.edit(config.edits_per_replica, rng)));
    }
    drop(outbound);

    let network = Network::new(
        inboxes,
        config.duplicate_rate,
        StdRng::seed_from_u64(config.seed),
    );
    let network = tokio::spawn(network.run(inbound));

    for editor in editors {
        editor.await??;
    }
    let stats = network.await?;
    for receiver in receivers {
        receiver.await??;
    }

    converged(&replicas, stats)
}

/// Checks that all replicas hold identical states and reports the result.
fn converged(replicas: &[Arc<Rga<char>>], network: NetworkStats) -> Result<SimReport, SimError> {
    let Some(first) = replicas.first() else {
        return Ok(SimReport {
            text: String::new(),
            vertices: 0,
            network,
        });
    };
    let expected = first.state();
    let text = first.text()?;
    for replica in &replicas[1..] {
        if replica.state() != expected {
            return Err(SimError::Diverged {
                replica: replica.replica_id(),
                expected: text,
                found: replica.text()?,
            });
        }
    }

    info!(
        replicas = replicas.len(),
        vertices = expected.added().len(),
        live = text.chars().count(),
        "replicas converged"
    );
    Ok(SimReport {
        text,
        vertices: expected.added().len(),
        network,
    })
}
