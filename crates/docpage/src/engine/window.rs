//! Page/limit defaulting and skip computation shared by engines.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{PageMetadata, TRACING_TARGET_ENGINE};

// Default values
const DEFAULT_LIMIT: i64 = 10;

/// Paging defaults applied by an engine to unset or invalid requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PagingConfig {
    /// Page size used when the request has none or a non-positive one
    #[cfg_attr(
        feature = "config",
        arg(long = "default-limit", env = "DOCPAGE_DEFAULT_LIMIT", default_value_t = DEFAULT_LIMIT)
    )]
    #[serde(default = "default_limit")]
    pub default_limit: i64,

    /// Upper bound for the page size (unbounded when unset)
    #[cfg_attr(feature = "config", arg(long = "max-limit", env = "DOCPAGE_MAX_LIMIT"))]
    #[serde(default)]
    pub max_limit: Option<i64>,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: None,
        }
    }
}

impl PagingConfig {
    /// Set the default page size.
    #[must_use]
    pub fn with_default_limit(mut self, default_limit: i64) -> Self {
        self.default_limit = default_limit;
        self
    }

    /// Set the maximum page size.
    #[must_use]
    pub fn with_max_limit(mut self, max_limit: i64) -> Self {
        self.max_limit = Some(max_limit);
        self
    }

    /// Validate the configuration and return any issues.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_limit < 1 {
            return Err(format!(
                "Default limit must be positive, got {}",
                self.default_limit
            ));
        }

        if let Some(max_limit) = self.max_limit {
            if max_limit < 1 {
                return Err(format!("Max limit must be positive, got {max_limit}"));
            }
            if max_limit < self.default_limit {
                return Err(format!(
                    "Max limit {max_limit} is below the default limit {}",
                    self.default_limit
                ));
            }
        }

        Ok(())
    }
}

/// A resolved page window: 1-based page and positive limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Page number (1-based).
    pub page: i64,
    /// Page size.
    pub limit: i64,
}

impl PageWindow {
    /// Resolves a requested page and limit against the paging defaults.
    ///
    /// A missing or non-positive page becomes `1`; a missing or non-positive
    /// limit becomes the default limit; a limit above the maximum is capped.
    pub fn resolve(page: Option<i64>, limit: Option<i64>, config: &PagingConfig) -> Self {
        let window = Self {
            page: page.filter(|&page| page > 0).unwrap_or(1),
            limit: limit
                .filter(|&limit| limit > 0)
                .unwrap_or(config.default_limit.max(1)),
        };
        let window = match config.max_limit {
            Some(max_limit) => Self {
                limit: window.limit.min(max_limit.max(1)),
                ..window
            },
            None => window,
        };

        if Some(window.page) != page || Some(window.limit) != limit {
            tracing::trace!(
                target: TRACING_TARGET_ENGINE,
                requested_page = ?page,
                requested_limit = ?limit,
                page = window.page,
                limit = window.limit,
                "Adjusted page window"
            );
        }

        window
    }

    /// Number of documents to skip before this page.
    #[inline]
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Builds page metadata for this window from the total count.
    #[inline]
    pub fn metadata(&self, total: i64) -> PageMetadata {
        PageMetadata::new(total, self.page, self.limit)
    }
}
