//! # polmon-core: Domain Types for the Policy Monitor
//!
//! Everything the dashboard knows about policy records lives here. The crate
//! has no I/O: the HTTP fetch of the source file lives in `polmon-client`
//! and the web shell lives in `polmon-api`. Both hand text and selections in,
//! and get records, pages and serialized exports back.
//!
//! ## Modules
//!
//! | Module         | Responsibility                                          |
//! |----------------|---------------------------------------------------------|
//! | [`record`]     | `Record`, `RecordId`, `Period` (`MM/YYYY` parsing)      |
//! | [`dataset`]    | CSV parsing, sort order, region/category/year choices   |
//! | [`filter`]     | `FilterSelection` and the pure filter function          |
//! | [`derived`]    | Recompute-on-change container with declared effects     |
//! | [`pagination`] | Page count, page slices, the windowed control strip     |
//! | [`export`]     | CSV and XLSX serialization of a filtered view           |
//! | [`contact`]    | Email and institution validation for export requests    |
//! | [`i18n`]       | Language selection, labels, localized column names      |
//!
//! ## Crate Policy
//!
//! - The [`Dataset`] is immutable once built. Every derived view refers to
//!   records by [`RecordId`], never by display text.
//! - No `.unwrap()` outside tests.

pub mod contact;
pub mod dataset;
pub mod derived;
pub mod error;
pub mod export;
pub mod filter;
pub mod i18n;
pub mod pagination;
pub mod record;

pub use contact::Contact;
pub use dataset::Dataset;
pub use derived::{FilteredCalc, SideEffect};
pub use error::{ContactError, DatasetError, ExportError, I18nError};
pub use export::ExportFormat;
pub use filter::{Choice, FilterSelection};
pub use i18n::{ColumnNames, Language, Translator};
pub use pagination::{Controls, DEFAULT_PAGE_SIZE};
pub use record::{Period, Record, RecordId};
