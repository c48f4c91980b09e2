// ABOUTME: Main library entry point for the Vital health analytics engine
// ABOUTME: Biomarker extraction, fitness aggregation, trend analysis, and health scoring
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

#![deny(unsafe_code)]

//! # Vital Engine
//!
//! A health-analytics engine: it ingests sparse daily wearable metrics and
//! unstructured lab-report text, extracts structured biomarkers, computes
//! trends, and produces a normalized 0-100 health score consumed by
//! dashboards and a conversational assistant.
//!
//! ## Architecture
//!
//! - **Extraction**: tiered lab-marker extraction - one text-completion
//!   call, then deterministic pattern matching. Total: never errors.
//! - **Intelligence**: pure, synchronous analytics - classification,
//!   day-filled fitness ranges, trend/prediction analysis, and the single
//!   unified scoring formula.
//! - **Store**: the record-store trait the engine reads through, with an
//!   in-memory reference backend.
//! - **Llm**: the completion-provider abstraction behind extraction and
//!   the assistant.
//!
//! Everything outside the two external touch points (completion provider,
//! record store) is deterministic given identical inputs. Correctness and
//! explainability of the score matter more here than raw throughput.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//! use vital_engine::config::EngineConfig;
//! use vital_engine::intelligence::build_snapshot;
//! use vital_engine::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vital_engine::errors::AppError> {
//!     let store = MemoryStore::new();
//!     let config = EngineConfig::default();
//!     let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
//!
//!     let snapshot = build_snapshot(&store, &config, Uuid::new_v4(), today).await?;
//!     println!("health score: {}", snapshot.health_score);
//!     Ok(())
//! }
//! ```

/// Health-context assembly for the conversational assistant
pub mod assistant;

/// Environment-based engine configuration
pub mod config;

/// Process-wide scoring weights, goals, and trend policies
pub mod constants;

/// Unified error handling with standard error codes
pub mod errors;

/// Tiered lab-marker extraction
pub mod extraction;

/// Pure analytics: classification, aggregation, trends, scoring, snapshots
pub mod intelligence;

/// Completion provider abstraction and the Gemini client
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Core domain types
pub mod models;

/// Lab-report processing pipeline
pub mod pipeline;

/// Record store abstraction and the in-memory reference backend
pub mod store;

pub use errors::{AppError, AppResult, ErrorCode};
pub use extraction::MarkerExtractor;
pub use intelligence::{
    analyze_marker_trend, build_fitness_range, build_snapshot, classify_marker,
    compute_health_score, HealthSnapshot,
};
pub use models::{DailyMetric, LabMarker, MarkerCandidate, MarkerStatus, TrendPoint};
pub use pipeline::process_report;
