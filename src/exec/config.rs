// Connection Configuration
//
// Settings for the pool a caller builds its `Connection` from. The crate
// itself only reads the DSN, to find the database name.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlKitError};
use crate::schema::DbName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DbConfig {
    /// Driver DSN, e.g. `user:pass@tcp(host:3306)/db?charset=utf8mb4`
    pub dsn: String,

    pub log_level: String,

    /// Connect timeout in seconds
    pub timeout: u64,

    pub max_open: u32,
    pub max_idle: u32,

    /// Idle connection lifetime in minutes
    pub max_idle_time: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            log_level: "info".to_string(),
            timeout: 30,
            max_open: 100,
            max_idle: 10,
            max_idle_time: 30,
        }
    }
}

impl DbConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Database named in the DSN path
    pub fn db_name(&self) -> Result<DbName> {
        db_name_from_dsn(&self.dsn)
    }
}

static DSN_DB_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"/([^/?]+)").expect("dsn pattern"));

/// First non-empty path segment of `dsn`, ending at the next `/` or `?`
pub fn db_name_from_dsn(dsn: &str) -> Result<DbName> {
    DSN_DB_NAME
        .captures(dsn)
        .and_then(|caps| caps.get(1))
        .map(|m| DbName::from(m.as_str()))
        .ok_or_else(|| SqlKitError::InvalidDsn(dsn.to_string()))
}
