// ABOUTME: Process-wide constants for scoring weights, goals, and trend policies
// ABOUTME: Single source of truth - no component may carry its own copy of these
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Constants Module
//!
//! Every weight and threshold the scoring, trend, and snapshot code shares.
//! These values are fixed process-wide; call sites must reference them here
//! so they can never diverge.

/// Health score component weights and caps
pub mod scoring {
    /// Daily step goal the fitness component saturates at
    pub const STEPS_GOAL: f64 = 10_000.0;
    /// Points awarded at the step goal
    pub const STEPS_MAX_POINTS: f64 = 25.0;
    /// Daily active-minutes goal the fitness component saturates at
    pub const ACTIVE_MINUTES_GOAL: f64 = 30.0;
    /// Points awarded at the active-minutes goal
    pub const ACTIVE_MAX_POINTS: f64 = 15.0;

    /// Cap on the lab component
    pub const LAB_MAX_POINTS: f64 = 40.0;
    /// Lab component when no markers are on file
    pub const LAB_BASELINE: f64 = 30.0;
    /// Per-marker points on the 0-10 scale, by status
    pub const POINTS_OPTIMAL: f64 = 10.0;
    /// Per-marker points for a normal status
    pub const POINTS_NORMAL: f64 = 8.0;
    /// Per-marker points for a borderline status
    pub const POINTS_BORDERLINE: f64 = 5.0;
    /// Per-marker points for a high or low status
    pub const POINTS_OUT_OF_RANGE: f64 = 2.0;
    /// Factor converting the 0-10 lab average to the 40-point scale
    pub const LAB_SCALE: f64 = 4.0;

    /// Cap on the trend component
    pub const TREND_MAX_POINTS: f64 = 20.0;
    /// Trend component when no trend signal is supplied
    pub const TREND_NEUTRAL: f64 = 10.0;
    /// Points per positive activity change in the change-based trend shape
    pub const TREND_CHANGE_POINTS: f64 = 10.0;

    /// Upper bound of the final score
    pub const SCORE_MAX: f64 = 100.0;
}

/// Activity goals surfaced on the snapshot
pub mod goals {
    /// Daily step goal shown to dashboards
    pub const STEPS: u32 = 10_000;
    /// Daily calorie-burn goal shown to dashboards
    pub const CALORIES: u32 = 400;
}

/// Trend analysis policies
///
/// The fitness and marker policies use different windows and thresholds on
/// purpose; they are separate products of the original analytics and must
/// stay independently tunable.
pub mod trends {
    /// Days in each half of the short-window fitness comparison
    pub const SHORT_WINDOW_DAYS: usize = 3;
    /// Days of history the snapshot trend block looks back over
    pub const SNAPSHOT_WINDOW_DAYS: i64 = 7;

    /// Absolute percent change below which a marker trend is "stable"
    pub const MARKER_STABLE_THRESHOLD_PCT: f64 = 10.0;
    /// Minimum history length for a trend classification
    pub const MIN_TREND_POINTS: usize = 2;
    /// Minimum history length for a prediction
    pub const MIN_PREDICTION_POINTS: usize = 3;
    /// Prediction confidence floor
    pub const CONFIDENCE_MIN: f64 = 0.3;
    /// Prediction confidence ceiling
    pub const CONFIDENCE_MAX: f64 = 0.9;
}

/// Extraction pipeline limits
pub mod extraction {
    /// Default time box for a single Tier-1 provider call, in seconds
    pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 20;
    /// Sampling temperature for the extraction prompt
    pub const EXTRACTION_TEMPERATURE: f32 = 0.1;
    /// Output token cap for the extraction prompt
    pub const EXTRACTION_MAX_TOKENS: u32 = 1000;
}

/// Snapshot assembly limits
pub mod snapshot {
    /// How many recent lab markers the snapshot highlights
    pub const RECENT_MARKER_LIMIT: usize = 5;
}
