//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Dataset**: loaded once at startup, immutable, shared by `Arc`.
//! - **Translator**: label lookup for the configured language.
//! - **Relay client**: absent when no relay endpoint is configured; exports
//!   then fail with a notice.
//! - **Sessions**: per-browser filter, page and view state.

use std::sync::Arc;
use std::time::Duration;

use polmon_client::RelayClient;
use polmon_core::{Dataset, Translator, DEFAULT_PAGE_SIZE};

use crate::session::SessionStore;

/// Default idle lifetime of a session (one day).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Default cap on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Runtime settings of the web shell.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Rows per table page.
    pub page_size: usize,
    /// Idle time after which a session may be evicted.
    pub session_ttl: Duration,
    /// Live sessions kept before the least recently seen is evicted.
    pub max_sessions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub dataset: Arc<Dataset>,
    pub translator: Arc<Translator>,
    pub relay: Option<RelayClient>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        dataset: Dataset,
        translator: Translator,
        relay: Option<RelayClient>,
    ) -> Self {
        let config = AppConfig {
            page_size: config.page_size.max(1),
            ..config
        };
        let dataset = Arc::new(dataset);
        let sessions = SessionStore::new(
            Arc::clone(&dataset),
            config.session_ttl,
            config.max_sessions,
        );
        Self {
            config,
            dataset,
            translator: Arc::new(translator),
            relay,
            sessions,
        }
    }
}
