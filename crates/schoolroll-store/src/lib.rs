//! Persistence for generated school data.
//!
//! The generator and exporter talk to the [`Store`] trait; [`SqliteStore`]
//! backs it with a disposable SQLite database that is rebuilt on every run.

pub mod error;
pub mod options;
pub mod sqlite;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use options::StoreOptions;
pub use sqlite::SqliteStore;
pub use store::{Store, SubmissionWithFamily};
