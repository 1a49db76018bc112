use std::path::PathBuf;

/// Options that control how the SQLite store is opened.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Database file; `None` keeps everything in memory.
    pub path: Option<PathBuf>,
    /// Drop and recreate every table when the store is opened.
    pub reset: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("database.sqlite")),
            reset: true,
        }
    }
}

impl StoreOptions {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            reset: true,
        }
    }
}
