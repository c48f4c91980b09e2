// ABOUTME: Dense day-filled fitness ranges and summaries over sparse metric rows
// ABOUTME: Current-day fallback resolution for snapshots
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Fitness Aggregator
//!
//! Wearable sync writes sparse rows - days with no recorded activity have
//! no row at all. Consumers need dense ranges, so [`build_fitness_range`] fills
//! every missing calendar day with zeros and computes summary averages over
//! the entire filled range, zero-filled days included.
//!
//! [`resolve_current_day`] implements the current-day fallback: early in
//! the day "today" often has nothing meaningful yet, so the prior day is
//! substituted when it recorded activity. The result always carries the
//! actual `data_date` used and an `is_current_day` flag - consumers must
//! check the flag rather than assume "today".

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::DailyMetric;
use crate::store::HealthStore;

/// One calendar day in a filled range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessDay {
    /// Calendar date
    pub date: NaiveDate,
    /// Short weekday label for chart axes (e.g. "Mon")
    pub day: String,
    /// Step count (0 when the day had no row)
    pub steps: u32,
    /// Calories burned
    pub calories: u32,
    /// Active minutes
    pub active_minutes: u32,
}

/// Summary statistics over a filled range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessSummary {
    /// Calendar days in the range
    pub total_days: usize,
    /// Days that had a stored row
    pub days_with_data: usize,
    /// Mean steps over the entire filled range
    pub average_steps: f64,
    /// Mean calories over the entire filled range
    pub average_calories: f64,
    /// Mean active minutes over the entire filled range
    pub average_active_minutes: f64,
}

/// A dense, strictly ascending range of fitness days with its summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessRange {
    /// Exactly one entry per calendar day, ascending
    pub days: Vec<FitnessDay>,
    /// Averages over the filled range
    pub summary: FitnessSummary,
}

/// Fallback-resolved activity for "today"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedDay {
    /// Step count of the resolved day
    pub steps: u32,
    /// Calories burned of the resolved day
    pub calories: u32,
    /// Active minutes of the resolved day
    pub active_minutes: u32,
    /// Distance in meters of the resolved day
    pub distance_meters: f64,
    /// The day the data actually came from
    pub data_date: NaiveDate,
    /// Whether `data_date` is the requested day
    pub is_current_day: bool,
}

/// Build a dense day-filled range with summary statistics
///
/// Output always has exactly `end - start + 1` entries in strictly
/// ascending date order, regardless of store sparsity.
///
/// # Errors
///
/// Returns [`AppError::invalid_input`] when `start > end` and
/// [`crate::errors::ErrorCode::DataStoreError`] when the store read fails.
pub async fn build_fitness_range<S: HealthStore + ?Sized>(
    store: &S,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<FitnessRange> {
    if start > end {
        return Err(AppError::invalid_input(format!(
            "range start {start} is after end {end}"
        )));
    }

    let rows = store
        .get_daily_metrics_range(user_id, start, end)
        .await
        .map_err(|e| AppError::from(e).with_user_id(user_id))?;
    let days_with_data = rows.len();

    let mut days = Vec::new();
    let mut row_iter = rows.into_iter().peekable();

    let mut date = start;
    loop {
        let row = row_iter.next_if(|r| r.date == date);
        let (steps, calories, active_minutes) = row
            .map_or((0, 0, 0), |r| (r.steps, r.calories_burned, r.active_minutes));

        days.push(FitnessDay {
            date,
            day: weekday_label(date),
            steps,
            calories,
            active_minutes,
        });

        if date == end {
            break;
        }
        date = date.succ_opt().ok_or_else(|| {
            AppError::internal(format!("calendar overflow advancing past {date}"))
        })?;
    }

    let total_days = days.len();
    let len = total_days as f64;
    let summary = FitnessSummary {
        total_days,
        days_with_data,
        average_steps: days.iter().map(|d| f64::from(d.steps)).sum::<f64>() / len,
        average_calories: days.iter().map(|d| f64::from(d.calories)).sum::<f64>() / len,
        average_active_minutes: days.iter().map(|d| f64::from(d.active_minutes)).sum::<f64>()
            / len,
    };

    debug!(
        user_id = %user_id,
        total_days,
        days_with_data,
        "Built fitness range"
    );

    Ok(FitnessRange { days, summary })
}

/// Resolve "today" with the prior-day fallback
///
/// If today's row is absent, or recorded zero steps and zero calories, the
/// prior day is substituted when it has non-zero steps or calories. The
/// returned `data_date` and `is_current_day` say what actually happened.
///
/// # Errors
///
/// Returns [`crate::errors::ErrorCode::DataStoreError`] when a store read
/// fails.
pub async fn resolve_current_day<S: HealthStore + ?Sized>(
    store: &S,
    user_id: Uuid,
    today: NaiveDate,
) -> AppResult<ResolvedDay> {
    let today_row = store
        .get_daily_metric(user_id, today)
        .await
        .map_err(|e| AppError::from(e).with_user_id(user_id))?;

    let needs_fallback = !today_row.as_ref().is_some_and(|row| row.has_activity());

    if needs_fallback {
        if let Some(yesterday) = today.pred_opt() {
            let yesterday_row = store
                .get_daily_metric(user_id, yesterday)
                .await
                .map_err(|e| AppError::from(e).with_user_id(user_id))?;

            if let Some(row) = yesterday_row.filter(DailyMetric::has_activity) {
                debug!(
                    user_id = %user_id,
                    data_date = %yesterday,
                    "Substituting prior day: today has no meaningful activity"
                );
                return Ok(resolved_from(&row, yesterday, false));
            }
        }
    }

    // No usable prior day: report today as-is, zeros included
    let row = today_row.unwrap_or_else(|| DailyMetric::empty(user_id, today));
    Ok(resolved_from(&row, today, true))
}

fn resolved_from(row: &DailyMetric, data_date: NaiveDate, is_current_day: bool) -> ResolvedDay {
    ResolvedDay {
        steps: row.steps,
        calories: row.calories_burned,
        active_minutes: row.active_minutes,
        distance_meters: row.distance_meters,
        data_date,
        is_current_day,
    }
}

fn weekday_label(date: NaiveDate) -> String {
    match date.weekday() {
        chrono::Weekday::Mon => "Mon",
        chrono::Weekday::Tue => "Tue",
        chrono::Weekday::Wed => "Wed",
        chrono::Weekday::Thu => "Thu",
        chrono::Weekday::Fri => "Fri",
        chrono::Weekday::Sat => "Sat",
        chrono::Weekday::Sun => "Sun",
    }
    .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn metric(user: Uuid, date: NaiveDate, steps: u32, calories: u32) -> DailyMetric {
        DailyMetric {
            steps,
            calories_burned: calories,
            ..DailyMetric::empty(user, date)
        }
    }

    #[tokio::test]
    async fn test_range_fills_missing_days() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .upsert_daily_metric(&metric(user, date(2), 6000, 300))
            .await
            .unwrap();
        store
            .upsert_daily_metric(&metric(user, date(5), 9000, 450))
            .await
            .unwrap();

        let range = build_fitness_range(&store, user, date(1), date(7)).await.unwrap();

        assert_eq!(range.days.len(), 7);
        assert!(range.days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(range.days[0].steps, 0);
        assert_eq!(range.days[1].steps, 6000);
        assert_eq!(range.summary.total_days, 7);
        assert_eq!(range.summary.days_with_data, 2);
        // Averages run over all 7 filled days, zero days included
        assert!((range.summary.average_steps - 15000.0 / 7.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_store_yields_all_zero_range() {
        let store = MemoryStore::new();
        let range = build_fitness_range(&store, Uuid::new_v4(), date(1), date(3))
            .await
            .unwrap();
        assert_eq!(range.days.len(), 3);
        assert_eq!(range.summary.days_with_data, 0);
        assert_eq!(range.summary.average_steps, 0.0);
    }

    #[tokio::test]
    async fn test_single_day_range() {
        let store = MemoryStore::new();
        let range = build_fitness_range(&store, Uuid::new_v4(), date(4), date(4))
            .await
            .unwrap();
        assert_eq!(range.days.len(), 1);
    }

    #[tokio::test]
    async fn test_inverted_range_is_invalid() {
        let store = MemoryStore::new();
        let err = build_fitness_range(&store, Uuid::new_v4(), date(5), date(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_fallback_substitutes_yesterday() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .upsert_daily_metric(&metric(user, date(9), 8000, 380))
            .await
            .unwrap();

        let resolved = resolve_current_day(&store, user, date(10)).await.unwrap();
        assert_eq!(resolved.steps, 8000);
        assert_eq!(resolved.data_date, date(9));
        assert!(!resolved.is_current_day);
    }

    #[tokio::test]
    async fn test_fallback_skipped_when_today_has_activity() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .upsert_daily_metric(&metric(user, date(9), 8000, 380))
            .await
            .unwrap();
        store
            .upsert_daily_metric(&metric(user, date(10), 2500, 120))
            .await
            .unwrap();

        let resolved = resolve_current_day(&store, user, date(10)).await.unwrap();
        assert_eq!(resolved.steps, 2500);
        assert!(resolved.is_current_day);
    }

    #[tokio::test]
    async fn test_fallback_with_no_usable_days_reports_today_zeros() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        let resolved = resolve_current_day(&store, user, date(10)).await.unwrap();
        assert_eq!(resolved.steps, 0);
        assert_eq!(resolved.data_date, date(10));
        assert!(resolved.is_current_day);
    }

    #[tokio::test]
    async fn test_zero_activity_today_with_zero_yesterday_stays_today() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .upsert_daily_metric(&metric(user, date(9), 0, 0))
            .await
            .unwrap();
        store
            .upsert_daily_metric(&metric(user, date(10), 0, 0))
            .await
            .unwrap();

        let resolved = resolve_current_day(&store, user, date(10)).await.unwrap();
        assert_eq!(resolved.data_date, date(10));
        assert!(resolved.is_current_day);
    }
}
