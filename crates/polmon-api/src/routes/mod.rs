//! # Dashboard Route Modules
//!
//! - `dashboard`: the page itself, filter and page changes, panel switches.
//! - `detail`: opening and leaving a single record.
//! - `export`: contact validation, file serialization and relay delivery.
//!
//! Every `POST` mutates the session and answers `303 See Other` to `/`,
//! which renders the new state and drains pending notices.

pub mod dashboard;
pub mod detail;
pub mod export;
