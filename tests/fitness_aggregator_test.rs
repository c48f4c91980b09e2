// ABOUTME: Integration tests for day-filled fitness ranges and summaries
// ABOUTME: Covers density, ordering, zero-filling, and the range average property
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

mod common;

use common::{jun, seed_metrics};
use uuid::Uuid;
use vital_engine::build_fitness_range;
use vital_engine::store::MemoryStore;

#[tokio::test]
async fn test_range_length_matches_calendar_regardless_of_sparsity() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    seed_metrics(&store, user, &[(jun(12), 4000, 210, 18)]).await;

    for (start, end, expected) in [
        (jun(10), jun(10), 1),
        (jun(10), jun(16), 7),
        (jun(1), jun(30), 30),
    ] {
        let range = build_fitness_range(&store, user, start, end).await.unwrap();
        assert_eq!(range.days.len(), expected);
        assert!(range.days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(range.summary.total_days, expected);
    }
}

#[tokio::test]
async fn test_missing_days_are_zero_filled() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    seed_metrics(&store, user, &[(jun(2), 6000, 300, 30), (jun(4), 8000, 400, 40)]).await;

    let range = build_fitness_range(&store, user, jun(1), jun(5)).await.unwrap();

    assert_eq!(range.days[0].steps, 0);
    assert_eq!(range.days[1].steps, 6000);
    assert_eq!(range.days[2].steps, 0);
    assert_eq!(range.days[3].steps, 8000);
    assert_eq!(range.days[4].steps, 0);
    assert_eq!(range.summary.days_with_data, 2);
}

#[tokio::test]
async fn test_averages_run_over_the_entire_filled_range() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    // 14000 steps over a 7-day range: the two recorded days must not be
    // averaged among themselves
    seed_metrics(&store, user, &[(jun(1), 7000, 350, 35), (jun(7), 7000, 350, 35)]).await;

    let range = build_fitness_range(&store, user, jun(1), jun(7)).await.unwrap();

    assert!((range.summary.average_steps - 2000.0).abs() < 1e-9);
    assert!((range.summary.average_calories - 100.0).abs() < 1e-9);
    assert!((range.summary.average_active_minutes - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_weekday_labels_follow_dates() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();

    // 2025-06-02 was a Monday
    let range = build_fitness_range(&store, user, jun(2), jun(4)).await.unwrap();
    let labels: Vec<&str> = range.days.iter().map(|d| d.day.as_str()).collect();
    assert_eq!(labels, vec!["Mon", "Tue", "Wed"]);
}
