//! Configuration for demo mode.
//!
//! Options are read from the `[demo]` section of a TOML file; every field
//! has a default so a missing file or section still yields a working
//! configuration.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::dispatcher::Latency;
use crate::error::DemoResult;
use crate::generator::GeneratorConfig;

/// Options for Demo Mode parsed from the `[demo]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Number of customers to synthesize
    #[serde(default = "default_customers")]
    pub customers: usize,
    /// Seed for the RNG to make runs reproducible
    #[serde(default)]
    pub seed: Option<u64>,
    /// Artificial latency range applied to every dispatched call
    #[serde(default)]
    pub latency: LatencyRange,
    /// Override for the demo flag marker-file location
    #[serde(default)]
    pub flag_path: Option<PathBuf>,
}

/// Uniform latency range in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatencyRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for LatencyRange {
    fn default() -> Self {
        Self {
            min_ms: 200,
            max_ms: 400,
        }
    }
}

fn default_customers() -> usize {
    55
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            customers: default_customers(),
            seed: None,
            latency: LatencyRange::default(),
            flag_path: None,
        }
    }
}

impl DemoConfig {
    /// Load the `[demo]` section from a TOML file. A file without that
    /// section yields the defaults.
    pub fn load(path: &str) -> DemoResult<Self> {
        let data = fs::read_to_string(path)?;
        let value: toml::Value = toml::from_str(&data)?;
        match value.get("demo") {
            Some(section) => Ok(section.clone().try_into()?),
            None => Ok(DemoConfig::default()),
        }
    }

    /// Generator settings derived from this configuration.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            customers: self.customers,
            seed: self.seed,
        }
    }

    /// Dispatcher latency derived from this configuration.
    pub fn latency(&self) -> Latency {
        Latency::from_millis(self.latency.min_ms, self.latency.max_ms)
    }
}
