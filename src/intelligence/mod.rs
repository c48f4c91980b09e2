// ABOUTME: Analytics for health data - classification, aggregation, trends, and scoring
// ABOUTME: Pure, synchronous computations over already-fetched rows
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Intelligence Module
//!
//! The analytical core of the engine. Every function here is pure and
//! synchronous over already-fetched data: no locks, no shared mutable
//! state, and concurrent invocations never interfere. The only async code
//! is in [`snapshot`] and [`fitness_aggregator`], which read from the
//! record store before delegating to the pure functions.

pub mod fitness_aggregator;
pub mod health_score;
pub mod marker_classifier;
pub mod snapshot;
pub mod trend_analyzer;

pub use fitness_aggregator::{
    build_fitness_range, resolve_current_day, FitnessDay, FitnessRange, FitnessSummary, ResolvedDay,
};
pub use health_score::{compute_health_score, FitnessSignal, TrendSignal};
pub use marker_classifier::{categorize, classify, classify_marker, MarkerClassification};
pub use snapshot::{build_snapshot, FitnessSnapshot, HealthSnapshot, LabHighlight};
pub use trend_analyzer::{
    analyze_fitness_window, analyze_marker_trend, build_marker_trend_report, FitnessTrend,
    MarkerPrediction, MarkerTrend, MarkerTrendReport, TrendDirection, WeeklyAverage,
};
