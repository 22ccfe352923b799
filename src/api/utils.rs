//! API utility types
//!
//! Shared state threaded through the HTTP handlers.

use crate::config::Config;
use crate::orchestrator::Orchestrator;
use crate::storage::Storage;
use std::sync::Arc;

/// Shared state for all routes: entity store, orchestrator, configuration
///
/// Constructed once in `main` and cloned per request; no global state.
pub type RouterState = (Arc<dyn Storage>, Arc<Orchestrator>, Arc<Config>);
