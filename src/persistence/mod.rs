//! Record persistence
//!
//! Features:
//! - Whole collection stored as one JSON array under a fixed key
//! - Corruption recovery (unparseable blob loads as an empty list)
//! - JSON export/import with wholesale replace

pub mod exchange;
pub mod store;

pub use exchange::{export_json, parse_import};
pub use store::RecordStore;
