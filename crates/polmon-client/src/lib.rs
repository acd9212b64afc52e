//! # polmon-client: HTTP Clients for the Policy Monitor
//!
//! Two outbound calls leave the process:
//!
//! - **Source fetch** ([`SourceClient`]): one `GET` against the repository
//!   contents API at startup, returning the raw CSV text.
//! - **Export relay** ([`RelayClient`]): one `POST` per export, carrying the
//!   serialized file base64-encoded in a JSON body.
//!
//! Neither call is retried. A failed fetch aborts startup; a failed relay
//! call becomes a user notification in the web layer.

pub mod config;
pub mod error;
pub mod relay;
pub mod source;

pub use config::{ConfigError, RelayConfig, SourceConfig};
pub use error::ClientError;
pub use relay::{ExportPayload, RelayClient};
pub use source::SourceClient;
