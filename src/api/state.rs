//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ConfigLoader;
use crate::payroll::{PayrollProcessor, RunContext};
use crate::store::PayrollStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// record store, the payroll processor wrapping it, and the configuration.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn PayrollStore>,
    processor: Arc<PayrollProcessor<dyn PayrollStore>>,
    config: Arc<ConfigLoader>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Creates a new application state over `store`.
    pub fn new(config: ConfigLoader, store: Arc<dyn PayrollStore>) -> Self {
        Self {
            processor: Arc::new(PayrollProcessor::new(Arc::clone(&store))),
            store,
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }

    /// Returns the record store.
    pub fn store(&self) -> &dyn PayrollStore {
        &*self.store
    }

    /// Returns the payroll processor.
    pub fn processor(&self) -> &Arc<PayrollProcessor<dyn PayrollStore>> {
        &self.processor
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Token cancelled on server shutdown; in-flight payroll runs stop at
    /// their next store call.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// A fresh context for one payroll run, cancelled with the server.
    pub fn run_context(&self) -> RunContext {
        RunContext::with_token(self.shutdown.child_token())
    }
}
