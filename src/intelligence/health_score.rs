// ABOUTME: The unified 0-100 health score - the only scoring implementation in the system
// ABOUTME: Deterministic additive formula with independently capped components
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Health Score Engine
//!
//! One deterministic formula: fitness (max 40) + lab (max 40) + trend
//! (max 20), rounded and clamped to [0, 100]. Every consumer - snapshot,
//! trends, dashboards - calls [`compute_health_score`]; no caller may
//! compute its own variant. The formula was once duplicated across call
//! sites with drifting weights, which is why consolidation here is a
//! correctness requirement rather than a style choice.
//!
//! Missing inputs resolve to documented defaults instead of erroring:
//! no fitness signal contributes 0, an empty lab set contributes the fixed
//! baseline 30, and an absent trend signal contributes the neutral 10.

use serde::{Deserialize, Serialize};

use crate::constants::scoring;
use crate::models::MarkerStatus;

/// Activity input to the fitness component
///
/// Callers pass either today's values or window averages - whichever view
/// of activity they are scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitnessSignal {
    /// Steps for the scored period
    pub steps: f64,
    /// Active minutes for the scored period
    pub active_minutes: f64,
}

/// Trend input to the trend component
///
/// Two accepted shapes, mirroring the two upstream producers: snapshots
/// supply recent activity changes, trend reports supply marker counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    /// Recent activity percent changes from the fitness trend
    ActivityChange {
        /// Percent change in steps
        steps_change: i32,
        /// Percent change in calories
        calories_change: i32,
    },
    /// Improving/declining marker counts from per-marker trend analysis
    MarkerCounts {
        /// Markers classified as improving
        improving: usize,
        /// Markers classified as declining
        declining: usize,
        /// Total markers analyzed
        total: usize,
    },
}

/// Compute the unified health score
///
/// Deterministic: identical inputs always produce the identical integer in
/// [0, 100].
#[must_use]
pub fn compute_health_score(
    fitness: Option<FitnessSignal>,
    lab_statuses: &[MarkerStatus],
    trend: Option<TrendSignal>,
) -> u8 {
    let total =
        fitness_component(fitness) + lab_component(lab_statuses) + trend_component(trend);

    total.round().clamp(0.0, scoring::SCORE_MAX) as u8
}

/// Fitness component: capped at 40 points
///
/// Non-decreasing in both inputs, saturating at the step and
/// active-minute goals.
fn fitness_component(fitness: Option<FitnessSignal>) -> f64 {
    let Some(signal) = fitness else {
        return 0.0;
    };

    let steps_score =
        (signal.steps / scoring::STEPS_GOAL * scoring::STEPS_MAX_POINTS).min(scoring::STEPS_MAX_POINTS);
    let active_score = (signal.active_minutes / scoring::ACTIVE_MINUTES_GOAL
        * scoring::ACTIVE_MAX_POINTS)
        .min(scoring::ACTIVE_MAX_POINTS);

    steps_score + active_score
}

/// Lab component: capped at 40 points, fixed baseline 30 with no markers
fn lab_component(lab_statuses: &[MarkerStatus]) -> f64 {
    if lab_statuses.is_empty() {
        return scoring::LAB_BASELINE;
    }

    let total: f64 = lab_statuses.iter().copied().map(status_points).sum();
    let average = total / lab_statuses.len() as f64;

    (average * scoring::LAB_SCALE).min(scoring::LAB_MAX_POINTS)
}

/// Trend component: capped at 20 points, neutral 10 with no signal
fn trend_component(trend: Option<TrendSignal>) -> f64 {
    match trend {
        Some(TrendSignal::ActivityChange {
            steps_change,
            calories_change,
        }) => {
            let mut points = 0.0;
            if steps_change > 0 {
                points += scoring::TREND_CHANGE_POINTS;
            }
            if calories_change > 0 {
                points += scoring::TREND_CHANGE_POINTS;
            }
            points
        }
        Some(TrendSignal::MarkerCounts {
            improving,
            declining,
            total,
        }) => {
            if total == 0 {
                return scoring::TREND_NEUTRAL;
            }
            let net = improving as f64 - declining as f64;
            let ratio = net / total as f64;
            scoring::TREND_NEUTRAL
                .mul_add(ratio, scoring::TREND_NEUTRAL)
                .clamp(0.0, scoring::TREND_MAX_POINTS)
        }
        None => scoring::TREND_NEUTRAL,
    }
}

/// Points a single status contributes on the 0-10 scale
#[must_use]
pub const fn status_points(status: MarkerStatus) -> f64 {
    match status {
        MarkerStatus::Optimal => scoring::POINTS_OPTIMAL,
        MarkerStatus::Normal => scoring::POINTS_NORMAL,
        MarkerStatus::Borderline => scoring::POINTS_BORDERLINE,
        MarkerStatus::High | MarkerStatus::Low => scoring::POINTS_OUT_OF_RANGE,
    }
}
