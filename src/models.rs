// ABOUTME: Core domain types for the Vital health analytics engine
// ABOUTME: Daily wearable metrics, lab markers, extraction candidates, and statuses
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Domain Models
//!
//! Persisted and transient data structures shared across the engine.
//! Persisted rows ([`DailyMetric`], [`LabMarker`]) are soft-deleted, never
//! hard-mutated; everything derived from them is computed per request and
//! never stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One day of wearable activity for one user
///
/// Upserted by sync keyed on `(user_id, date)` - at most one non-deleted
/// row per user and calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMetric {
    /// Owning user
    pub user_id: Uuid,
    /// Calendar day this row covers (unique per user)
    pub date: NaiveDate,
    /// Step count for the day
    pub steps: u32,
    /// Distance covered in meters
    pub distance_meters: f64,
    /// Calories burned
    pub calories_burned: u32,
    /// Minutes of moderate-or-higher activity
    pub active_minutes: u32,
    /// Soft-delete timestamp; deleted rows are invisible to every read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DailyMetric {
    /// Create a metric row with all counters zeroed
    #[must_use]
    pub const fn empty(user_id: Uuid, date: NaiveDate) -> Self {
        Self {
            user_id,
            date,
            steps: 0,
            distance_meters: 0.0,
            calories_burned: 0,
            active_minutes: 0,
            deleted_at: None,
        }
    }

    /// Whether the day recorded any meaningful activity
    ///
    /// Used by the current-day fallback: a day with zero steps and zero
    /// calories is treated the same as a missing day.
    #[must_use]
    pub const fn has_activity(&self) -> bool {
        self.steps > 0 || self.calories_burned > 0
    }
}

/// A structured biomarker extracted from a lab report
///
/// Created only by the extraction pipeline; immutable once persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabMarker {
    /// Row identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Report the marker was extracted from
    pub lab_report_id: Uuid,
    /// Standardized marker name (non-empty)
    pub marker_name: String,
    /// Measured value (always finite)
    pub value: f64,
    /// Measurement unit (non-empty)
    pub unit: String,
    /// Date the sample was taken
    pub taken_at: NaiveDate,
    /// Row creation timestamp
    pub created_at: DateTime<Utc>,
    /// Soft-delete timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Transient extraction output, validated before becoming a [`LabMarker`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerCandidate {
    /// Marker name as reported by the extraction tier
    pub marker: String,
    /// Numeric value
    pub value: f64,
    /// Unit string
    pub unit: String,
}

impl MarkerCandidate {
    /// Field-level validation applied to every candidate independently
    ///
    /// Invalid candidates are dropped silently; they never fail the batch.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.marker.trim().is_empty() && !self.unit.trim().is_empty() && self.value.is_finite()
    }
}

/// Qualitative classification of a marker value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStatus {
    /// Within the optimal reference band
    Optimal,
    /// Acceptable but not optimal
    Normal,
    /// Approaching a clinically relevant boundary
    Borderline,
    /// Above the reference range
    High,
    /// Below the reference range
    Low,
}

impl MarkerStatus {
    /// Lowercase wire representation, matching the serde rename
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Normal => "normal",
            Self::Borderline => "borderline",
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// One point in a single-marker history, derived on read and never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Sample date
    pub date: NaiveDate,
    /// Measured value
    pub value: f64,
    /// Status of the value under the shared classification table
    pub status: MarkerStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(marker: &str, value: f64, unit: &str) -> MarkerCandidate {
        MarkerCandidate {
            marker: marker.into(),
            value,
            unit: unit.into(),
        }
    }

    #[test]
    fn test_candidate_validation() {
        assert!(candidate("Hemoglobin", 14.5, "g/dL").is_valid());
        assert!(!candidate("", 14.5, "g/dL").is_valid());
        assert!(!candidate("   ", 14.5, "g/dL").is_valid());
        assert!(!candidate("Hemoglobin", 14.5, "").is_valid());
        assert!(!candidate("Hemoglobin", f64::NAN, "g/dL").is_valid());
        assert!(!candidate("Hemoglobin", f64::INFINITY, "g/dL").is_valid());
    }

    #[test]
    fn test_has_activity() {
        let user = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut metric = DailyMetric::empty(user, date);
        assert!(!metric.has_activity());

        metric.steps = 100;
        assert!(metric.has_activity());

        metric.steps = 0;
        metric.calories_burned = 50;
        assert!(metric.has_activity());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&MarkerStatus::Borderline).unwrap();
        assert_eq!(json, "\"borderline\"");
        let back: MarkerStatus = serde_json::from_str("\"optimal\"").unwrap();
        assert_eq!(back, MarkerStatus::Optimal);
    }
}
