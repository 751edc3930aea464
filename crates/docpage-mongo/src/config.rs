//! MongoDB engine configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use docpage::PagingConfig;
use serde::{Deserialize, Serialize};

// Default values
const DEFAULT_LIMIT: i64 = 10;

/// Configuration for the MongoDB engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct MongoConfig {
    /// MongoDB connection string
    #[cfg_attr(feature = "config", arg(long = "mongo-url", env = "MONGO_URL"))]
    pub mongo_url: String,

    /// Database holding the paginated collections
    #[cfg_attr(feature = "config", arg(long = "mongo-database", env = "MONGO_DATABASE"))]
    pub mongo_database: String,

    /// Page size used when a query sets none or a non-positive one
    #[cfg_attr(
        feature = "config",
        arg(long = "mongo-default-limit", env = "MONGO_DEFAULT_LIMIT", default_value_t = DEFAULT_LIMIT)
    )]
    #[serde(default = "default_limit")]
    pub mongo_default_limit: i64,

    /// Upper bound for the page size (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "mongo-max-limit", env = "MONGO_MAX_LIMIT")
    )]
    #[serde(default)]
    pub mongo_max_limit: Option<i64>,

    /// Server-side time limit per query in seconds (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "mongo-max-time", env = "MONGO_MAX_TIME_SECS")
    )]
    #[serde(default)]
    pub mongo_max_time: Option<u64>,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl MongoConfig {
    /// Create a new configuration for a connection string and database.
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            mongo_url: url.into(),
            mongo_database: database.into(),
            mongo_default_limit: DEFAULT_LIMIT,
            mongo_max_limit: None,
            mongo_max_time: None,
        }
    }

    /// Returns the paging defaults applied to queries.
    #[inline]
    pub fn paging(&self) -> PagingConfig {
        let paging = PagingConfig::default().with_default_limit(self.mongo_default_limit);
        match self.mongo_max_limit {
            Some(max_limit) => paging.with_max_limit(max_limit),
            None => paging,
        }
    }

    /// Returns the server-side time limit as a Duration, if set.
    #[inline]
    pub fn max_time(&self) -> Option<Duration> {
        self.mongo_max_time.map(Duration::from_secs)
    }

    /// Set the default page size.
    #[must_use]
    pub fn with_default_limit(mut self, limit: i64) -> Self {
        self.mongo_default_limit = limit;
        self
    }

    /// Set the maximum page size.
    #[must_use]
    pub fn with_max_limit(mut self, limit: i64) -> Self {
        self.mongo_max_limit = Some(limit);
        self
    }

    /// Set the server-side time limit in seconds.
    #[must_use]
    pub fn with_max_time_secs(mut self, secs: u64) -> Self {
        self.mongo_max_time = Some(secs);
        self
    }

    /// Validate the configuration and return any issues.
    pub fn validate(&self) -> Result<(), String> {
        if self.mongo_url.is_empty() {
            return Err("Connection string cannot be empty".to_string());
        }
        if !self.mongo_url.starts_with("mongodb://") && !self.mongo_url.starts_with("mongodb+srv://")
        {
            return Err(format!("Invalid connection string: {}", self.mongo_url));
        }

        if self.mongo_database.is_empty() {
            return Err("Database name cannot be empty".to_string());
        }
        if self.mongo_database.contains(['/', '\\', '.', ' ', '"', '$']) {
            return Err(format!("Invalid database name: {}", self.mongo_database));
        }

        if self.mongo_max_time == Some(0) {
            return Err("Max time must be positive".to_string());
        }

        self.paging().validate()
    }
}
