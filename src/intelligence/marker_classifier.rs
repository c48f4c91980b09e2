// ABOUTME: Marker status classification and category lookup shared by every consumer
// ABOUTME: Case-insensitive family matching with unit-aware numeric thresholds
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Marker Classifier
//!
//! The one classification table in the system. The score engine, trend
//! analyzer, and snapshot orchestrator all classify through these functions
//! so a marker can never carry two different statuses depending on the call
//! site.
//!
//! Matching is case-insensitive substring lookup against marker families.
//! More specific families (HDL, LDL) are checked before the generic
//! cholesterol family so their dedicated thresholds apply. Unmatched
//! markers default to `Normal` / "Other".

use serde::{Deserialize, Serialize};

use crate::models::MarkerStatus;

/// Combined classification result for the library boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerClassification {
    /// Qualitative status of the value
    pub status: MarkerStatus,
    /// Marker family category
    pub category: String,
}

/// Classify a marker value into a status
///
/// Pure: identical arguments always yield the identical status.
#[must_use]
pub fn classify(name: &str, value: f64, unit: &str) -> MarkerStatus {
    let name = name.to_lowercase();
    let unit = unit.to_lowercase();

    if name.contains("hemoglobin") {
        return if (12.0..=16.0).contains(&value) {
            MarkerStatus::Optimal
        } else if value < 12.0 {
            MarkerStatus::Low
        } else {
            MarkerStatus::High
        };
    }

    if name.contains("glucose") && unit.contains("mg/dl") {
        return if (70.0..=100.0).contains(&value) {
            MarkerStatus::Optimal
        } else if value > 100.0 && value <= 125.0 {
            MarkerStatus::Borderline
        } else if value < 70.0 {
            MarkerStatus::Low
        } else {
            MarkerStatus::High
        };
    }

    // HDL and LDL carry their own thresholds and must win over the generic
    // cholesterol family even though their names contain "cholesterol"
    if name.contains("hdl") && unit.contains("mg/dl") {
        return if value >= 60.0 {
            MarkerStatus::Optimal
        } else if value >= 40.0 {
            MarkerStatus::Normal
        } else {
            MarkerStatus::Low
        };
    }

    if name.contains("ldl") && unit.contains("mg/dl") {
        return if value < 100.0 {
            MarkerStatus::Optimal
        } else if value < 130.0 {
            MarkerStatus::Normal
        } else if value < 160.0 {
            MarkerStatus::Borderline
        } else {
            MarkerStatus::High
        };
    }

    if name.contains("cholesterol") && unit.contains("mg/dl") {
        return if value < 200.0 {
            MarkerStatus::Optimal
        } else if value < 240.0 {
            MarkerStatus::Borderline
        } else {
            MarkerStatus::High
        };
    }

    if name.contains("hba1c") && unit.contains('%') {
        return if value < 5.7 {
            MarkerStatus::Optimal
        } else if value < 6.5 {
            MarkerStatus::Borderline
        } else {
            MarkerStatus::High
        };
    }

    MarkerStatus::Normal
}

/// Resolve the category family for a marker name
#[must_use]
pub fn categorize(name: &str) -> &'static str {
    let name = name.to_lowercase();

    if name.contains("hemoglobin")
        || name.contains("hematocrit")
        || name.contains("rbc")
        || name.contains("wbc")
    {
        return "Blood Count";
    }
    if name.contains("cholesterol")
        || name.contains("hdl")
        || name.contains("ldl")
        || name.contains("triglyceride")
    {
        return "Lipid Profile";
    }
    if name.contains("glucose") || name.contains("hba1c") || name.contains("insulin") {
        return "Metabolic";
    }
    if name.contains("tsh") || name.contains("t3") || name.contains("t4") {
        return "Thyroid";
    }

    "Other"
}

/// Classify a marker into status and category in one call
#[must_use]
pub fn classify_marker(name: &str, value: f64, unit: &str) -> MarkerClassification {
    MarkerClassification {
        status: classify(name, value, unit),
        category: categorize(name).to_owned(),
    }
}

/// Whether lower values are the healthy direction for this marker
///
/// Used by the trend analyzer to orient percent changes.
#[must_use]
pub fn is_lower_better(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("cholesterol") || name.contains("glucose")
}
