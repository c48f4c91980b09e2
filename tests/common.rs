// ABOUTME: Shared test utilities for vital_engine integration tests
// ABOUTME: Scripted completion provider, failing store, and seeding helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence
#![allow(dead_code)]

//! Shared test utilities for `vital_engine`
//!
//! Provides a scripted [`CompletionProvider`], a store that always fails,
//! and seeding helpers so integration tests run with no live network or
//! database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use vital_engine::errors::AppError;
use vital_engine::llm::{ChatRequest, ChatResponse, CompletionProvider};
use vital_engine::models::{DailyMetric, LabMarker};
use vital_engine::store::{HealthStore, MemoryStore};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Scripted completion provider: returns a fixed outcome and counts calls
pub struct MockProvider {
    outcome: MockOutcome,
    calls: AtomicUsize,
}

/// What the mock provider does when called
pub enum MockOutcome {
    /// Return this content as a successful completion
    Reply(String),
    /// Fail with a rate-limit signal
    RateLimited,
    /// Fail with a transport error
    TransportError,
}

impl MockProvider {
    pub fn replying(content: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Reply(content.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            MockOutcome::Reply(content) => Ok(ChatResponse {
                content: content.clone(),
                model: "mock-model".into(),
                usage: None,
            }),
            MockOutcome::RateLimited => Err(AppError::rate_limited("mock rate limit")),
            MockOutcome::TransportError => Err(AppError::provider("mock transport failure")),
        }
    }
}

/// Store whose every operation fails, for error-propagation tests
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

#[async_trait]
impl HealthStore for FailingStore {
    async fn upsert_daily_metric(&self, _metric: &DailyMetric) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_daily_metric(
        &self,
        _user_id: Uuid,
        _date: NaiveDate,
    ) -> Result<Option<DailyMetric>> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_daily_metrics_range(
        &self,
        _user_id: Uuid,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<DailyMetric>> {
        Err(anyhow!("store unavailable"))
    }

    async fn insert_lab_markers(&self, _markers: &[LabMarker]) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_recent_lab_markers(&self, _user_id: Uuid, _limit: usize) -> Result<Vec<LabMarker>> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_marker_history(
        &self,
        _user_id: Uuid,
        _marker_name: &str,
    ) -> Result<Vec<LabMarker>> {
        Err(anyhow!("store unavailable"))
    }

    async fn soft_delete_report_markers(
        &self,
        _user_id: Uuid,
        _lab_report_id: Uuid,
    ) -> Result<u64> {
        Err(anyhow!("store unavailable"))
    }
}

/// Build a metric row with the given activity counters
pub fn metric(user: Uuid, date: NaiveDate, steps: u32, calories: u32, active: u32) -> DailyMetric {
    DailyMetric {
        user_id: user,
        date,
        steps,
        distance_meters: f64::from(steps) * 0.75,
        calories_burned: calories,
        active_minutes: active,
        deleted_at: None,
    }
}

/// Build a lab marker row
pub fn lab_marker(
    user: Uuid,
    report: Uuid,
    name: &str,
    value: f64,
    unit: &str,
    taken_at: NaiveDate,
) -> LabMarker {
    LabMarker {
        id: Uuid::new_v4(),
        user_id: user,
        lab_report_id: report,
        marker_name: name.into(),
        value,
        unit: unit.into(),
        taken_at,
        created_at: Utc::now(),
        deleted_at: None,
    }
}

/// Seed a store with one metric row per (date, steps, calories, active) tuple
pub async fn seed_metrics(store: &MemoryStore, user: Uuid, rows: &[(NaiveDate, u32, u32, u32)]) {
    init_test_logging();
    for &(date, steps, calories, active) in rows {
        store
            .upsert_daily_metric(&metric(user, date, steps, calories, active))
            .await
            .unwrap();
    }
}

/// June 2025 date helper
pub fn jun(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}
