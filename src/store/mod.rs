// ABOUTME: Record store abstraction consumed by the analytics engine
// ABOUTME: Soft-delete aware trait over daily metrics and lab markers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Record Store Abstraction
//!
//! The engine never talks to a storage engine directly; it reads and writes
//! through [`HealthStore`]. Implementations must filter soft-deleted rows
//! out of every read and keep ranged queries in ascending date order - the
//! trend code depends on both invariants.
//!
//! The [`memory`] backend is the reference implementation used by tests and
//! demos.

pub mod memory;

pub use memory::MemoryStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{DailyMetric, LabMarker};

/// Store abstraction over the two persisted row families
///
/// All reads are soft-delete aware. Failures surface as errors for that one
/// operation only - every engine output is derived, so there is no partial
/// state to corrupt.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Insert or replace the metric row for `(metric.user_id, metric.date)`
    ///
    /// At most one non-deleted row may exist per user and calendar day.
    async fn upsert_daily_metric(&self, metric: &DailyMetric) -> Result<()>;

    /// Fetch the metric row for one user and day, if present
    async fn get_daily_metric(&self, user_id: Uuid, date: NaiveDate)
        -> Result<Option<DailyMetric>>;

    /// Fetch metric rows in `[start, end]`, ascending by date
    ///
    /// Days with no row are simply absent; the fitness aggregator fills them.
    async fn get_daily_metrics_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetric>>;

    /// Persist a batch of extracted lab markers
    async fn insert_lab_markers(&self, markers: &[LabMarker]) -> Result<()>;

    /// Fetch the most recent markers for a user, newest first by creation time
    async fn get_recent_lab_markers(&self, user_id: Uuid, limit: usize) -> Result<Vec<LabMarker>>;

    /// Fetch the full history of one marker for a user, ascending by sample date
    async fn get_marker_history(&self, user_id: Uuid, marker_name: &str)
        -> Result<Vec<LabMarker>>;

    /// Soft-delete every marker belonging to one lab report
    ///
    /// Returns the number of rows marked.
    async fn soft_delete_report_markers(&self, user_id: Uuid, lab_report_id: Uuid) -> Result<u64>;
}
