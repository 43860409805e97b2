//! Settings for the replica simulation binary.
//!
//! Every field can be overridden from the environment; anything missing or
//! unparsable keeps its default.

use std::str::FromStr;

use tracing::warn;

pub const ENV_REPLICAS: &str = "RGA_SIM_REPLICAS";
pub const ENV_EDITS: &str = "RGA_SIM_EDITS";
pub const ENV_DUPLICATE_RATE: &str = "RGA_SIM_DUPLICATE_RATE";
pub const ENV_SEED: &str = "RGA_SIM_SEED";

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Number of replicas editing concurrently
    pub replicas: usize,
    /// Local edits each replica performs
    pub edits_per_replica: usize,
    /// Probability that the network delivers a delta twice
    pub duplicate_rate: f64,
    /// Seed for edit choice and delivery order
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            replicas: 3,
            edits_per_replica: 200,
            duplicate_rate: 0.25,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Reads the `RGA_SIM_*` variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut config = SimulationConfig {
            replicas: parse_or(&lookup, ENV_REPLICAS, defaults.replicas),
            edits_per_replica: parse_or(&lookup, ENV_EDITS, defaults.edits_per_replica),
            duplicate_rate: parse_or(&lookup, ENV_DUPLICATE_RATE, defaults.duplicate_rate),
            seed: parse_or(&lookup, ENV_SEED, defaults.seed),
        };

        if config.replicas == 0 {
            warn!(key = ENV_REPLICAS, "need at least one replica, using default");
            config.replicas = defaults.replicas;
        }
        if !(0.0..=1.0).contains(&config.duplicate_rate) {
            warn!(
                key = ENV_DUPLICATE_RATE,
                value = config.duplicate_rate,
                "rate must be within 0..=1, using default"
            );
            config.duplicate_rate = defaults.duplicate_rate;
        }
        config
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparsable setting");
            default
        }),
    }
}
