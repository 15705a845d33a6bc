//! Demo-mode backend simulation for a restaurant loyalty console.
//!
//! The crate lets a thin client run fully functional without a real
//! server: a synthetic [`Dataset`](types::Dataset) is generated in memory,
//! held by a [`SessionStore`], and served through a [`MockApiClient`] that
//! mirrors the real REST API's routing, filtering, sorting, and
//! referential-update semantics. The [`DemoMode`] controller wires the
//! pieces together and owns the enable/disable lifecycle.

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod generator;
pub mod store;
pub mod types;

pub use config::DemoConfig;
pub use controller::{DemoFlagStore, DemoMode, FileFlagStore, MemoryFlagStore};
pub use dispatcher::{ApiTransport, Latency, MockApiClient};
pub use error::{DemoError, DemoResult};
pub use generator::{DatasetGenerator, GeneratorConfig};
pub use store::SessionStore;

/// Initialize env_logger once for binaries and examples. Repeated calls
/// are harmless.
#[cfg(feature = "logging")]
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
