//! Store configuration.
//!
//! The only configurable things are where the JSON document lives and how a
//! document that cannot be read is treated.

use std::path::{Path, PathBuf};

/// Environment variable naming the document path.
pub const DB_ENV: &str = "TASKBOARD_DB";
/// Environment variable that turns on strict reads.
pub const STRICT_ENV: &str = "TASKBOARD_STRICT";

/// What to do when the document exists but cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Log a warning and carry on with an empty document.
    #[default]
    Lenient,
    /// Return the error to the caller.
    Strict,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub read_policy: ReadPolicy,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            read_policy: ReadPolicy::default(),
        }
    }

    pub fn with_read_policy(mut self, policy: ReadPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    /// Resolve the config from an explicit path (flag or env) and the strict switch.
    pub fn resolve(explicit: Option<&Path>, strict: bool) -> Self {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(default_db_path);
        let policy = if strict { ReadPolicy::Strict } else { ReadPolicy::Lenient };
        StoreConfig::new(path).with_read_policy(policy)
    }
}

/// `~/.taskboard/db.json`, or `./db.json` when there is no home directory.
pub fn default_db_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".taskboard").join("db.json"),
        None => PathBuf::from("db.json"),
    }
}
