// ABOUTME: In-memory reference implementation of the HealthStore trait
// ABOUTME: Backs tests and demos with no external storage engine
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! In-memory [`HealthStore`] backend
//!
//! Honors the same invariants a real backend must: upsert keyed on
//! `(user, date)`, soft-delete filtering on every read, ascending order on
//! ranged and history queries.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::HealthStore;
use crate::models::{DailyMetric, LabMarker};

/// In-memory store backed by tokio `RwLock`s
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    metrics: Arc<RwLock<HashMap<(Uuid, NaiveDate), DailyMetric>>>,
    markers: Arc<RwLock<Vec<LabMarker>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthStore for MemoryStore {
    async fn upsert_daily_metric(&self, metric: &DailyMetric) -> Result<()> {
        let mut metrics = self.metrics.write().await;
        metrics.insert((metric.user_id, metric.date), metric.clone());
        Ok(())
    }

    async fn get_daily_metric(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DailyMetric>> {
        let metrics = self.metrics.read().await;
        Ok(metrics
            .get(&(user_id, date))
            .filter(|metric| metric.deleted_at.is_none())
            .cloned())
    }

    async fn get_daily_metrics_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetric>> {
        let metrics = self.metrics.read().await;
        let mut rows: Vec<DailyMetric> = metrics
            .values()
            .filter(|metric| {
                metric.user_id == user_id
                    && metric.deleted_at.is_none()
                    && metric.date >= start
                    && metric.date <= end
            })
            .cloned()
            .collect();
        rows.sort_by_key(|metric| metric.date);
        Ok(rows)
    }

    async fn insert_lab_markers(&self, markers: &[LabMarker]) -> Result<()> {
        let mut stored = self.markers.write().await;
        stored.extend_from_slice(markers);
        Ok(())
    }

    async fn get_recent_lab_markers(&self, user_id: Uuid, limit: usize) -> Result<Vec<LabMarker>> {
        let stored = self.markers.read().await;
        let mut rows: Vec<LabMarker> = stored
            .iter()
            .filter(|marker| marker.user_id == user_id && marker.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn get_marker_history(
        &self,
        user_id: Uuid,
        marker_name: &str,
    ) -> Result<Vec<LabMarker>> {
        let stored = self.markers.read().await;
        let mut rows: Vec<LabMarker> = stored
            .iter()
            .filter(|marker| {
                marker.user_id == user_id
                    && marker.deleted_at.is_none()
                    && marker.marker_name.eq_ignore_ascii_case(marker_name)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|marker| marker.taken_at);
        Ok(rows)
    }

    async fn soft_delete_report_markers(&self, user_id: Uuid, lab_report_id: Uuid) -> Result<u64> {
        let mut stored = self.markers.write().await;
        let now = Utc::now();
        let mut marked = 0;
        for marker in stored.iter_mut() {
            if marker.user_id == user_id
                && marker.lab_report_id == lab_report_id
                && marker.deleted_at.is_none()
            {
                marker.deleted_at = Some(now);
                marked += 1;
            }
        }
        Ok(marked)
    }
}
