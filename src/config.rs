// ABOUTME: Environment-based engine configuration
// ABOUTME: Provider credentials, time boxes, and snapshot limits
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Engine Configuration
//!
//! Environment-only configuration, resolved once at startup and passed
//! explicitly to the components that need it. No module-level globals -
//! every core function receives its dependencies as parameters so tests
//! run with no live network or database.

use std::env;

use crate::constants::{extraction, snapshot, trends};

/// Environment variable holding the Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the Tier-1 time box (seconds)
pub const PROVIDER_TIMEOUT_ENV: &str = "VITAL_PROVIDER_TIMEOUT_SECS";
/// Environment variable overriding the snapshot marker limit
pub const MARKER_LIMIT_ENV: &str = "VITAL_RECENT_MARKER_LIMIT";
/// Environment variable overriding the snapshot trend window (days)
pub const TREND_WINDOW_ENV: &str = "VITAL_TREND_WINDOW_DAYS";

/// Resolved engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Gemini API key; `None` short-circuits Tier-1 extraction entirely
    pub gemini_api_key: Option<String>,
    /// Time box for a single Tier-1 provider call, in seconds
    pub provider_timeout_secs: u64,
    /// How many recent markers the snapshot highlights
    pub recent_marker_limit: usize,
    /// Days of fitness history the snapshot trend block covers
    pub trend_window_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            provider_timeout_secs: extraction::DEFAULT_PROVIDER_TIMEOUT_SECS,
            recent_marker_limit: snapshot::RECENT_MARKER_LIMIT,
            trend_window_days: trends::SNAPSHOT_WINDOW_DAYS,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment
    ///
    /// Absent or unparseable overrides fall back to the defaults in
    /// [`crate::constants`]. A missing API key is not an error - the
    /// extraction pipeline degrades to the pattern tier without it.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: env::var(GEMINI_API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            provider_timeout_secs: parse_env(
                PROVIDER_TIMEOUT_ENV,
                extraction::DEFAULT_PROVIDER_TIMEOUT_SECS,
            ),
            recent_marker_limit: parse_env(MARKER_LIMIT_ENV, snapshot::RECENT_MARKER_LIMIT),
            trend_window_days: parse_env(TREND_WINDOW_ENV, trends::SNAPSHOT_WINDOW_DAYS),
        }
    }

    /// Whether a Tier-1 credential is configured
    #[must_use]
    pub const fn has_provider_credential(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

fn parse_env<T: std::str::FromStr + Copy>(var: &str, default: T) -> T {
    env::var(var)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(!config.has_provider_credential());
        assert_eq!(
            config.provider_timeout_secs,
            extraction::DEFAULT_PROVIDER_TIMEOUT_SECS
        );
        assert_eq!(config.recent_marker_limit, snapshot::RECENT_MARKER_LIMIT);
        assert_eq!(config.trend_window_days, trends::SNAPSHOT_WINDOW_DAYS);
    }
}
