//! Demo mode lifecycle.
//!
//! [`DemoMode`] is the capability object the application holds: it owns the
//! session store while demo mode is active, hands out dispatcher clients
//! bound to it, and keeps the durable flag in sync. The state machine is
//! Inactive → Active on [`DemoMode::enable`] and Active → Inactive on
//! [`DemoMode::disable`] or [`DemoMode::logout`]; the initial state follows
//! the persisted flag.

mod flag;

pub use flag::{DemoFlagStore, FileFlagStore, MemoryFlagStore};

use std::sync::{Arc, Mutex};

use log::info;

use crate::config::DemoConfig;
use crate::dispatcher::{Latency, MockApiClient};
use crate::error::DemoResult;
use crate::generator::{DatasetGenerator, GeneratorConfig};
use crate::store::SessionStore;

/// Lifecycle wrapper for demo mode.
pub struct DemoMode {
    store: Option<Arc<Mutex<SessionStore>>>,
    active: bool,
    flag: Box<dyn DemoFlagStore>,
    generator_config: GeneratorConfig,
    latency: Latency,
}

impl DemoMode {
    /// Build with default generation and latency settings. Demo mode
    /// starts Active (with a freshly generated dataset) when the durable
    /// flag was persisted by a previous session.
    pub fn new(flag: Box<dyn DemoFlagStore>) -> DemoResult<Self> {
        Self::with_config(&DemoConfig::default(), flag)
    }

    /// Build from configuration.
    pub fn with_config(config: &DemoConfig, flag: Box<dyn DemoFlagStore>) -> DemoResult<Self> {
        let mut demo = Self {
            store: None,
            active: false,
            flag,
            generator_config: config.generator_config(),
            latency: config.latency(),
        };
        if demo.flag.is_set() {
            demo.enable()?;
        }
        Ok(demo)
    }

    /// Whether demo mode is currently active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switch to Active: generate a dataset if none exists, then persist
    /// the flag. Enabling while already Active is a no-op.
    pub fn enable(&mut self) -> DemoResult<()> {
        if self.store.is_none() {
            let mut generator = DatasetGenerator::new(self.generator_config.clone());
            let dataset = generator.generate();
            self.store = Some(Arc::new(Mutex::new(SessionStore::new(dataset))));
            info!("demo mode dataset generated");
        }
        self.active = true;
        self.flag.persist()?;
        Ok(())
    }

    /// Switch to Inactive: clear the flag (memory and durable) and discard
    /// the dataset in place.
    pub fn disable(&mut self) -> DemoResult<()> {
        self.active = false;
        self.store = None;
        self.flag.clear()?;
        info!("demo mode disabled; dataset discarded");
        Ok(())
    }

    /// Logging out always also disables demo mode.
    pub fn logout(&mut self) -> DemoResult<()> {
        if self.active {
            self.disable()?;
        }
        Ok(())
    }

    /// Handle to the live session store, `None` while Inactive.
    pub fn store(&self) -> Option<Arc<Mutex<SessionStore>>> {
        if self.active {
            self.store.clone()
        } else {
            None
        }
    }

    /// A dispatcher client bound to the live dataset, `None` while
    /// Inactive. Drop-in replacement for the real HTTP client.
    pub fn client(&self) -> Option<MockApiClient> {
        self.store()
            .map(|store| MockApiClient::with_latency(store, self.latency))
    }
}
