// ABOUTME: Snapshot orchestrator composing fitness, labs, trends, and the score
// ABOUTME: Pure composition over store reads - no extraction, no persistence
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Snapshot Orchestrator
//!
//! Builds the immutable per-user read model dashboards consume: fallback
//! resolved "today" fitness, the most recent classified markers, the
//! 7-day fitness trend, and the unified score. Regenerated on every
//! request, never stored. All store reads are soft-delete aware and
//! chronologically ordered by the [`crate::store::HealthStore`] contract.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::constants::goals;
use crate::errors::{AppError, AppResult};
use crate::intelligence::fitness_aggregator::resolve_current_day;
use crate::intelligence::health_score::{compute_health_score, FitnessSignal, TrendSignal};
use crate::intelligence::marker_classifier::{categorize, classify};
use crate::intelligence::trend_analyzer::{analyze_fitness_window, FitnessTrend};
use crate::models::MarkerStatus;
use crate::store::HealthStore;

/// Fitness block of the snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessSnapshot {
    /// Steps for the resolved day
    pub steps_today: u32,
    /// Calories for the resolved day
    pub calories_today: u32,
    /// Active minutes for the resolved day
    pub active_minutes_today: u32,
    /// Distance for the resolved day, in km rounded to 0.1
    pub distance_today_km: f64,
    /// Daily step goal
    pub steps_goal: u32,
    /// Daily calorie goal
    pub calories_goal: u32,
    /// The day the data actually came from
    pub data_date: NaiveDate,
    /// Whether `data_date` is the requested day; consumers must check this
    /// before presenting the numbers as "today"
    pub is_current_day: bool,
}

/// One classified recent marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabHighlight {
    /// Marker name
    pub marker_name: String,
    /// Measured value
    pub value: f64,
    /// Measurement unit
    pub unit: String,
    /// Status under the shared classification table
    pub status: MarkerStatus,
    /// Marker family category
    pub category: String,
    /// Sample date
    pub taken_at: NaiveDate,
}

/// The per-user health read model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Fallback-resolved fitness for the requested day
    pub fitness: FitnessSnapshot,
    /// Most recent classified markers, newest first
    pub lab_highlights: Vec<LabHighlight>,
    /// Short-window fitness trend over the snapshot window
    pub trends: FitnessTrend,
    /// Unified health score
    pub health_score: u8,
    /// When this snapshot was generated
    pub last_updated: DateTime<Utc>,
}

/// Build the health snapshot for one user
///
/// Pure composition: reads, classifies, analyzes, scores. The `today`
/// parameter anchors the fitness window and the current-day fallback so
/// the output is deterministic given identical store contents.
///
/// # Errors
///
/// Propagates [`crate::errors::ErrorCode::DataStoreError`] when any store
/// read fails; no partial snapshot is ever returned.
pub async fn build_snapshot<S: HealthStore + ?Sized>(
    store: &S,
    config: &EngineConfig,
    user_id: Uuid,
    today: NaiveDate,
) -> AppResult<HealthSnapshot> {
    let resolved = resolve_current_day(store, user_id, today).await?;

    let window_start = today - Duration::days(config.trend_window_days - 1);
    let week_rows = store
        .get_daily_metrics_range(user_id, window_start, today)
        .await
        .map_err(|e| AppError::from(e).with_user_id(user_id))?;
    let trends = analyze_fitness_window(&week_rows);

    let markers = store
        .get_recent_lab_markers(user_id, config.recent_marker_limit)
        .await
        .map_err(|e| AppError::from(e).with_user_id(user_id))?;

    let lab_highlights: Vec<LabHighlight> = markers
        .iter()
        .map(|marker| LabHighlight {
            marker_name: marker.marker_name.clone(),
            value: marker.value,
            unit: marker.unit.clone(),
            status: classify(&marker.marker_name, marker.value, &marker.unit),
            category: categorize(&marker.marker_name).to_owned(),
            taken_at: marker.taken_at,
        })
        .collect();

    let statuses: Vec<MarkerStatus> = lab_highlights.iter().map(|h| h.status).collect();

    let health_score = compute_health_score(
        Some(FitnessSignal {
            steps: trends.weekly_average.steps as f64,
            active_minutes: trends.weekly_average.active_minutes as f64,
        }),
        &statuses,
        Some(TrendSignal::ActivityChange {
            steps_change: trends.steps_change,
            calories_change: trends.calories_change,
        }),
    );

    debug!(
        user_id = %user_id,
        health_score,
        markers = lab_highlights.len(),
        is_current_day = resolved.is_current_day,
        "Built health snapshot"
    );

    Ok(HealthSnapshot {
        fitness: FitnessSnapshot {
            steps_today: resolved.steps,
            calories_today: resolved.calories,
            active_minutes_today: resolved.active_minutes,
            distance_today_km: (resolved.distance_meters / 1000.0 * 10.0).round() / 10.0,
            steps_goal: goals::STEPS,
            calories_goal: goals::CALORIES,
            data_date: resolved.data_date,
            is_current_day: resolved.is_current_day,
        },
        lab_highlights,
        trends,
        health_score,
        last_updated: Utc::now(),
    })
}
