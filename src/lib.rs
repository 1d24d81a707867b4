//! Case Conf - a local-first student record keeper
//!
//! Core modules:
//! - `record`: Student record model
//! - `platform`: Key-value storage backends (LocalStorage on web, files on native)
//! - `persistence`: Single-blob record store, JSON export/import
//! - `repository`: CRUD and filtering over the store
//! - `report`: Printable HTML report per student

pub mod error;
pub mod ids;
pub mod persistence;
pub mod platform;
pub mod record;
pub mod report;
pub mod repository;

pub use error::{RecordError, Result};
pub use ids::{IdGenerator, RandomIds, SeededIds};
pub use persistence::RecordStore;
pub use platform::{KeyValueStorage, MemoryStorage, UnavailableStorage};
pub use record::StudentRecord;
pub use repository::RecordRepository;

/// App configuration constants
pub mod consts {
    /// Storage key of the student collection
    pub const STUDENTS_STORAGE_KEY: &str = "case_conf_students_v1";
    /// File name offered for JSON export
    pub const EXPORT_FILE_NAME: &str = "students_backup.json";
    /// Native data directory when none is given
    pub const DEFAULT_DATA_DIR: &str = ".case-conf";
}
