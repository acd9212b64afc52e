//! # Middleware
//!
//! Tower middleware for the web shell:
//! - [`metrics`]: request, error and export counters.
//!
//! Session resolution lives in [`crate::session`] next to the state it
//! manages. Request tracing is `tower_http::trace::TraceLayer`.

pub mod metrics;
