//! One simulated collaborator: a replica, the edits it makes, and the deltas
//! it receives.

use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::crdt::{Rga, RgaError, State};
use crate::sim::SimError;
use crate::sim::network::Envelope;

pub struct Peer {
    replica: Arc<Rga<char>>,
    outbound: UnboundedSender<Envelope>,
}

impl Peer {
    pub fn new(replica: Arc<Rga<char>>, outbound: UnboundedSender<Envelope>) -> Self {
        Self { replica, outbound }
    }

    /// Performs `edits` random local edits, broadcasting every delta.
    pub async fn edit(self, edits: usize, mut rng: StdRng) -> Result<usize, SimError> {
        let mut sent = 0;
        for _ in 0..edits {
            let len = self.replica.len()?;
            let ch = rng.random_range(b'a'..=b'z') as char;
            let deltas = match rng.random_range(0..10) {
                0..=3 => self.replica.insert_at(rng.random_range(0..=len), ch)?,
                4..=5 => vec![self.replica.push(ch)?],
                6..=8 if len > 0 => match self.replica.remove_at(rng.random_range(0..len)) {
                    Ok(delta) => vec![delta],
                    // A remote removal landed since `len` was read.
                    Err(RgaError::PositionOutOfRange { .. }) => Vec::new(),
                    Err(err) => return Err(err.into()),
                },
                9 if len > 0 => self.replica.set(rng.random_range(0..len), ch)?,
                _ => vec![self.replica.push(ch)?],
            };
            for delta in &deltas {
                self.send(delta)?;
                sent += 1;
            }
            tokio::task::yield_now().await;
        }
        info!(
            replica = self.replica.replica_id(),
            edits,
            deltas = sent,
            "finished editing"
        );
        Ok(sent)
    }

    fn send(&self, delta: &State<char>) -> Result<(), SimError> {
        let payload = serde_json::to_string(delta)?;
        self.outbound
            .send(Envelope {
                from: self.replica.replica_id(),
                payload,
            })
            .map_err(|_| SimError::ChannelClosed)
    }
}

/// Applies every delta arriving in `inbox` until the network closes it.
pub async fn receive(
    replica: Arc<Rga<char>>,
    mut inbox: UnboundedReceiver<String>,
) -> Result<usize, SimError> {
    let mut applied = 0;
    while let Some(payload) = inbox.recv().await {
        let delta: State<char> = serde_json::from_str(&payload)?;
        replica.apply_remote(&delta)?;
        applied += 1;
    }
    debug!(replica = replica.replica_id(), applied, "inbox closed");
    Ok(applied)
}
