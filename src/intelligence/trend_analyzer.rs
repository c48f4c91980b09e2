// ABOUTME: Short-window fitness trends and per-marker trend/prediction analysis
// ABOUTME: Two distinct, documented comparison policies - fitness and marker
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Trend Analyzer
//!
//! Two comparison policies live here, and they differ on purpose:
//!
//! - **Fitness policy**: mean of the most recent up-to-3 days against the
//!   mean of the preceding up-to-3 days, percent change rounded to an
//!   integer.
//! - **Marker policy**: chronologically ascending history split into floor
//!   halves, percent change of the half means, ±10% stability band.
//!
//! Both operate on ascending histories only. Histories shorter than two
//! points resolve to documented defaults (zero change, `Unknown`) rather
//! than erroring.

use serde::{Deserialize, Serialize};

use crate::constants::trends::{
    CONFIDENCE_MAX, CONFIDENCE_MIN, MARKER_STABLE_THRESHOLD_PCT, MIN_PREDICTION_POINTS,
    MIN_TREND_POINTS, SHORT_WINDOW_DAYS,
};
use crate::intelligence::marker_classifier::{categorize, classify, is_lower_better};
use crate::models::{DailyMetric, LabMarker, TrendPoint};

/// Direction of a marker trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Values are moving in the healthy direction for this marker
    Improving,
    /// Change stayed inside the stability band
    Stable,
    /// Values are moving in the unhealthy direction
    Declining,
    /// Not enough history to compare
    Unknown,
}

/// Whole-window activity averages, rounded to integers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyAverage {
    /// Mean steps over the window
    pub steps: i64,
    /// Mean calories over the window
    pub calories: i64,
    /// Mean active minutes over the window
    pub active_minutes: i64,
}

/// Short-window fitness trend result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessTrend {
    /// Percent change in steps, recent window vs prior window
    pub steps_change: i32,
    /// Percent change in calories, recent window vs prior window
    pub calories_change: i32,
    /// Averages over the whole supplied window
    pub weekly_average: WeeklyAverage,
}

/// Linear extrapolation of the next marker value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerPrediction {
    /// Projected next value, rounded to 2 decimals
    pub next_value: f64,
    /// Confidence in [0.3, 0.9]; larger swings mean lower confidence
    pub confidence: f64,
    /// Short guidance string selected by (marker family, trend)
    pub recommendation: String,
}

/// Trend classification for one marker history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerTrend {
    /// Direction of the trend
    pub trend: TrendDirection,
    /// Present only when the history has at least 3 points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<MarkerPrediction>,
}

/// Full per-marker trend report for dashboard consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerTrendReport {
    /// Marker name
    pub marker_name: String,
    /// Marker family category
    pub category: String,
    /// Measurement unit
    pub unit: String,
    /// Ascending classified history
    pub history: Vec<TrendPoint>,
    /// Direction of the trend
    pub trend: TrendDirection,
    /// Prediction, when the history supports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<MarkerPrediction>,
}

/// Analyze a short window of fitness metrics
///
/// `days` must be ascending by date, as the store returns them. With fewer
/// than two days the change is 0 and the single available day's raw values
/// (or zeros) are reported as the average.
#[must_use]
pub fn analyze_fitness_window(days: &[DailyMetric]) -> FitnessTrend {
    if days.len() < MIN_TREND_POINTS {
        let single = days.first();
        return FitnessTrend {
            steps_change: 0,
            calories_change: 0,
            weekly_average: WeeklyAverage {
                steps: single.map_or(0, |d| i64::from(d.steps)),
                calories: single.map_or(0, |d| i64::from(d.calories_burned)),
                active_minutes: single.map_or(0, |d| i64::from(d.active_minutes)),
            },
        };
    }

    let recent_start = days.len().saturating_sub(SHORT_WINDOW_DAYS);
    let prior_start = days.len().saturating_sub(SHORT_WINDOW_DAYS * 2);
    let recent = &days[recent_start..];
    let prior = &days[prior_start..recent_start];

    let recent_steps = mean(recent.iter().map(|d| f64::from(d.steps)));
    let recent_calories = mean(recent.iter().map(|d| f64::from(d.calories_burned)));
    let prior_steps = if prior.is_empty() {
        recent_steps
    } else {
        mean(prior.iter().map(|d| f64::from(d.steps)))
    };
    let prior_calories = if prior.is_empty() {
        recent_calories
    } else {
        mean(prior.iter().map(|d| f64::from(d.calories_burned)))
    };

    FitnessTrend {
        steps_change: percent_change_rounded(prior_steps, recent_steps),
        calories_change: percent_change_rounded(prior_calories, recent_calories),
        weekly_average: WeeklyAverage {
            steps: mean(days.iter().map(|d| f64::from(d.steps))).round() as i64,
            calories: mean(days.iter().map(|d| f64::from(d.calories_burned))).round() as i64,
            active_minutes: mean(days.iter().map(|d| f64::from(d.active_minutes))).round() as i64,
        },
    }
}

/// Analyze a single-marker history
///
/// `history` must be chronologically ascending. Shorter than 2 points
/// yields `Unknown` with no prediction; 2 points yield a classification
/// only; 3 or more add a prediction.
#[must_use]
pub fn analyze_marker_trend(marker_name: &str, history: &[TrendPoint]) -> MarkerTrend {
    if history.len() < MIN_TREND_POINTS {
        return MarkerTrend {
            trend: TrendDirection::Unknown,
            prediction: None,
        };
    }

    let half = history.len() / 2;
    let first_mean = mean(history[..half].iter().map(|p| p.value));
    let second_mean = mean(history[half..].iter().map(|p| p.value));

    // A zero first-half mean leaves the percent change undefined; treat the
    // history as stable rather than dividing by zero
    let change_percent = if first_mean == 0.0 {
        0.0
    } else {
        (second_mean - first_mean) / first_mean * 100.0
    };

    let trend = classify_direction(marker_name, change_percent);

    let prediction = (history.len() >= MIN_PREDICTION_POINTS).then(|| MarkerPrediction {
        next_value: round_2((2.0 * second_mean) - first_mean),
        confidence: (1.0 - change_percent.abs() / 100.0).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX),
        recommendation: recommendation_for(marker_name, trend),
    });

    MarkerTrend { trend, prediction }
}

/// Build the full trend report for one marker's stored rows
///
/// Rows must be ascending by sample date. Each point is classified through
/// the shared table; returns `None` for an empty history.
#[must_use]
pub fn build_marker_trend_report(markers: &[LabMarker]) -> Option<MarkerTrendReport> {
    let newest = markers.last()?;

    let history: Vec<TrendPoint> = markers
        .iter()
        .map(|marker| TrendPoint {
            date: marker.taken_at,
            value: marker.value,
            status: classify(&marker.marker_name, marker.value, &marker.unit),
        })
        .collect();

    let analysis = analyze_marker_trend(&newest.marker_name, &history);

    Some(MarkerTrendReport {
        marker_name: newest.marker_name.clone(),
        category: categorize(&newest.marker_name).to_owned(),
        unit: newest.unit.clone(),
        history,
        trend: analysis.trend,
        prediction: analysis.prediction,
    })
}

fn classify_direction(marker_name: &str, change_percent: f64) -> TrendDirection {
    if change_percent.abs() <= MARKER_STABLE_THRESHOLD_PCT {
        return TrendDirection::Stable;
    }

    let improving = if is_lower_better(marker_name) {
        change_percent < 0.0
    } else {
        change_percent > 0.0
    };

    if improving {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    }
}

/// Select the guidance string for a marker and trend
fn recommendation_for(marker_name: &str, trend: TrendDirection) -> String {
    let name = marker_name.to_lowercase();

    if trend == TrendDirection::Improving {
        return format!(
            "Your {marker_name} is trending in a positive direction. Keep up your current health practices!"
        );
    }

    if trend == TrendDirection::Declining {
        if name.contains("cholesterol") {
            return "Consider dietary adjustments: reduce saturated fats, increase fiber intake, and maintain regular exercise.".to_owned();
        }
        if name.contains("glucose") {
            return "Monitor carbohydrate intake, increase physical activity, and consider consulting with a healthcare provider.".to_owned();
        }
        if name.contains("hemoglobin") {
            return "Ensure adequate iron intake through diet or supplements, and discuss with your doctor if levels continue declining.".to_owned();
        }
    }

    format!(
        "Your {marker_name} appears stable. Continue monitoring and maintain current health practices."
    )
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn percent_change_rounded(prior: f64, recent: f64) -> i32 {
    if prior == 0.0 {
        0
    } else {
        ((recent - prior) / prior * 100.0).round() as i32
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarkerStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn day(d: u32, steps: u32, calories: u32, active: u32) -> DailyMetric {
        DailyMetric {
            steps,
            calories_burned: calories,
            active_minutes: active,
            ..DailyMetric::empty(Uuid::nil(), date(d))
        }
    }

    fn points(values: &[f64]) -> Vec<TrendPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| TrendPoint {
                date: date(1 + i as u32),
                value,
                status: MarkerStatus::Normal,
            })
            .collect()
    }

    #[test]
    fn test_fitness_trend_three_vs_three() {
        let days = vec![
            day(1, 4000, 200, 20),
            day(2, 4000, 200, 20),
            day(3, 4000, 200, 20),
            day(4, 5000, 180, 25),
            day(5, 5000, 180, 25),
            day(6, 5000, 180, 25),
        ];
        let trend = analyze_fitness_window(&days);
        assert_eq!(trend.steps_change, 25);
        assert_eq!(trend.calories_change, -10);
        assert_eq!(trend.weekly_average.steps, 4500);
    }

    #[test]
    fn test_fitness_trend_short_history() {
        let days = vec![day(1, 7000, 320, 40)];
        let trend = analyze_fitness_window(&days);
        assert_eq!(trend.steps_change, 0);
        assert_eq!(trend.calories_change, 0);
        assert_eq!(trend.weekly_average.steps, 7000);
        assert_eq!(trend.weekly_average.calories, 320);
        assert_eq!(trend.weekly_average.active_minutes, 40);

        let empty = analyze_fitness_window(&[]);
        assert_eq!(empty.steps_change, 0);
        assert_eq!(empty.weekly_average.steps, 0);
    }

    #[test]
    fn test_fitness_trend_partial_prior_window() {
        // 4 days: prior window is just the first day
        let days = vec![
            day(1, 2000, 100, 10),
            day(2, 4000, 220, 22),
            day(3, 4000, 220, 22),
            day(4, 4000, 220, 22),
        ];
        let trend = analyze_fitness_window(&days);
        assert_eq!(trend.steps_change, 100);
    }

    #[test]
    fn test_fitness_trend_zero_prior_mean() {
        let days = vec![
            day(1, 0, 0, 0),
            day(2, 0, 0, 0),
            day(3, 0, 0, 0),
            day(4, 6000, 250, 30),
            day(5, 6000, 250, 30),
            day(6, 6000, 250, 30),
        ];
        let trend = analyze_fitness_window(&days);
        assert_eq!(trend.steps_change, 0);
        assert_eq!(trend.calories_change, 0);
    }

    #[test]
    fn test_marker_trend_too_short() {
        let analysis = analyze_marker_trend("Glucose", &points(&[95.0]));
        assert_eq!(analysis.trend, TrendDirection::Unknown);
        assert!(analysis.prediction.is_none());

        let analysis = analyze_marker_trend("Glucose", &points(&[]));
        assert_eq!(analysis.trend, TrendDirection::Unknown);
    }

    #[test]
    fn test_marker_trend_two_points_no_prediction() {
        // 220 -> 190: change about -13.6%, lower-is-better marker
        let analysis = analyze_marker_trend("LDL Cholesterol", &points(&[220.0, 190.0]));
        assert_eq!(analysis.trend, TrendDirection::Improving);
        assert!(analysis.prediction.is_none());
    }

    #[test]
    fn test_marker_trend_stable_band() {
        let analysis = analyze_marker_trend("Glucose", &points(&[100.0, 105.0]));
        assert_eq!(analysis.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_marker_trend_polarity() {
        // Rising glucose is declining health
        let analysis = analyze_marker_trend("Glucose", &points(&[90.0, 120.0]));
        assert_eq!(analysis.trend, TrendDirection::Declining);

        // Rising hemoglobin is improving
        let analysis = analyze_marker_trend("Hemoglobin", &points(&[10.0, 13.0]));
        assert_eq!(analysis.trend, TrendDirection::Improving);

        // Falling hemoglobin is declining
        let analysis = analyze_marker_trend("Hemoglobin", &points(&[13.0, 10.0]));
        assert_eq!(analysis.trend, TrendDirection::Declining);
    }

    #[test]
    fn test_marker_prediction_extrapolates_halves() {
        // halves: [200] and [190, 180] -> first 200, second 185, change -7.5%
        let analysis = analyze_marker_trend("LDL Cholesterol", &points(&[200.0, 190.0, 180.0]));
        assert_eq!(analysis.trend, TrendDirection::Stable);
        let prediction = analysis.prediction.unwrap();
        assert!((prediction.next_value - 170.0).abs() < 1e-9);
        assert!((prediction.confidence - CONFIDENCE_MAX).abs() < 1e-9);
        assert!(prediction.recommendation.contains("appears stable"));
    }

    #[test]
    fn test_marker_prediction_improving_history() {
        // halves: [220, 210] and [180, 170] -> change about -18.6%, lower is better
        let analysis =
            analyze_marker_trend("LDL Cholesterol", &points(&[220.0, 210.0, 180.0, 170.0]));
        assert_eq!(analysis.trend, TrendDirection::Improving);
        let prediction = analysis.prediction.unwrap();
        assert!((prediction.next_value - 135.0).abs() < 1e-9);
        assert!(prediction.recommendation.contains("positive direction"));
    }

    #[test]
    fn test_prediction_confidence_clamped() {
        // Massive swing: confidence floors at 0.3
        let analysis = analyze_marker_trend("Hemoglobin", &points(&[10.0, 10.0, 30.0, 30.0]));
        let prediction = analysis.prediction.unwrap();
        assert!((prediction.confidence - CONFIDENCE_MIN).abs() < 1e-9);

        // Tiny swing: confidence capped at 0.9
        let analysis = analyze_marker_trend("Hemoglobin", &points(&[100.0, 100.0, 100.5, 100.5]));
        let prediction = analysis.prediction.unwrap();
        assert!((prediction.confidence - CONFIDENCE_MAX).abs() < 1e-9);
    }

    #[test]
    fn test_declining_recommendations_by_family() {
        let rec = recommendation_for("Total Cholesterol", TrendDirection::Declining);
        assert!(rec.contains("saturated fats"));

        let rec = recommendation_for("Glucose", TrendDirection::Declining);
        assert!(rec.contains("carbohydrate"));

        let rec = recommendation_for("Hemoglobin", TrendDirection::Declining);
        assert!(rec.contains("iron"));

        let rec = recommendation_for("Vitamin D", TrendDirection::Stable);
        assert!(rec.contains("appears stable"));
    }

    #[test]
    fn test_report_classifies_history() {
        let user = Uuid::new_v4();
        let report_id = Uuid::new_v4();
        let markers: Vec<LabMarker> = [(1, 220.0), (10, 190.0)]
            .iter()
            .map(|&(d, value)| LabMarker {
                id: Uuid::new_v4(),
                user_id: user,
                lab_report_id: report_id,
                marker_name: "LDL Cholesterol".into(),
                value,
                unit: "mg/dL".into(),
                taken_at: date(d),
                created_at: chrono::Utc::now(),
                deleted_at: None,
            })
            .collect();

        let report = build_marker_trend_report(&markers).unwrap();
        assert_eq!(report.category, "Lipid Profile");
        assert_eq!(report.trend, TrendDirection::Improving);
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.history[0].status, MarkerStatus::High);
        assert_eq!(report.history[1].status, MarkerStatus::High);
        assert!(report.prediction.is_none());

        assert!(build_marker_trend_report(&[]).is_none());
    }
}
