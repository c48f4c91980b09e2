// ABOUTME: Health-context assembly and assistant replies over the completion provider
// ABOUTME: Builds the data context block; holds no conversation state
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Conversational Assistant Support
//!
//! The assistant surface the snapshot feeds. This module only gathers a
//! user's recent data into a prompt context and relays one question to the
//! [`CompletionProvider`]; session handling and chat history belong to the
//! caller.

use chrono::{Duration, NaiveDate};
use std::fmt::Write as _;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::constants::trends::SNAPSHOT_WINDOW_DAYS;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, CompletionProvider};
use crate::models::{DailyMetric, LabMarker};
use crate::store::HealthStore;

/// Sampling temperature for assistant replies
const ASSISTANT_TEMPERATURE: f32 = 0.7;
/// Output token cap for assistant replies
const ASSISTANT_MAX_TOKENS: u32 = 500;

/// A user's recent data, gathered for prompt context
#[derive(Debug, Clone)]
pub struct HealthContext {
    /// Recent daily metrics, ascending
    pub metrics: Vec<DailyMetric>,
    /// Recent lab markers, newest first
    pub markers: Vec<LabMarker>,
}

impl HealthContext {
    /// Gather recent metrics and markers for one user
    ///
    /// # Errors
    ///
    /// Propagates [`crate::errors::ErrorCode::DataStoreError`] from the
    /// store reads.
    pub async fn gather<S: HealthStore + ?Sized>(
        store: &S,
        config: &EngineConfig,
        user_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<Self> {
        let start = today - Duration::days(SNAPSHOT_WINDOW_DAYS - 1);
        let metrics = store
            .get_daily_metrics_range(user_id, start, today)
            .await
            .map_err(|e| AppError::from(e).with_user_id(user_id))?;
        let markers = store
            .get_recent_lab_markers(user_id, config.recent_marker_limit)
            .await
            .map_err(|e| AppError::from(e).with_user_id(user_id))?;

        Ok(Self { metrics, markers })
    }

    /// Render the context block appended to the system prompt
    #[must_use]
    pub fn context_block(&self) -> String {
        let mut block = String::new();

        if !self.metrics.is_empty() {
            block.push_str("\n\nRecent Fitness Data:\n");
            for metric in &self.metrics {
                let _ = writeln!(
                    block,
                    "{}: {} steps, {} calories, {} active minutes",
                    metric.date, metric.steps, metric.calories_burned, metric.active_minutes
                );
            }
        }

        if !self.markers.is_empty() {
            block.push_str("\n\nRecent Lab Results:\n");
            for marker in &self.markers {
                let _ = writeln!(
                    block,
                    "{}: {} {} ({})",
                    marker.marker_name, marker.value, marker.unit, marker.taken_at
                );
            }
        }

        block
    }
}

/// Answer one health question with the user's data as context
///
/// # Errors
///
/// Propagates provider errors unchanged; unlike extraction there is no
/// fallback tier for conversation.
pub async fn answer(
    provider: &dyn CompletionProvider,
    context: &HealthContext,
    question: &str,
) -> AppResult<String> {
    let system_prompt = format!(
        "You are a helpful health assistant with access to the user's fitness and lab data.\n\
         Provide personalized health insights based on their data.\n\n\
         Guidelines:\n\
         - Be encouraging and supportive\n\
         - Reference specific data points when relevant\n\
         - Suggest actionable health improvements\n\
         - Recommend consulting healthcare providers for medical concerns\n\
         - Keep responses concise but informative\n{}",
        context.context_block()
    );

    let request = ChatRequest::new(vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(question),
    ])
    .with_temperature(ASSISTANT_TEMPERATURE)
    .with_max_tokens(ASSISTANT_MAX_TOKENS);

    let response = provider.complete(&request).await?;
    Ok(response.content.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn test_context_block_includes_both_sections() {
        let user = Uuid::new_v4();
        let context = HealthContext {
            metrics: vec![DailyMetric {
                steps: 8000,
                calories_burned: 380,
                active_minutes: 42,
                ..DailyMetric::empty(user, date(9))
            }],
            markers: vec![LabMarker {
                id: Uuid::new_v4(),
                user_id: user,
                lab_report_id: Uuid::new_v4(),
                marker_name: "Glucose".into(),
                value: 95.0,
                unit: "mg/dL".into(),
                taken_at: date(3),
                created_at: Utc::now(),
                deleted_at: None,
            }],
        };

        let block = context.context_block();
        assert!(block.contains("Recent Fitness Data"));
        assert!(block.contains("8000 steps"));
        assert!(block.contains("Recent Lab Results"));
        assert!(block.contains("Glucose: 95 mg/dL"));
    }

    #[test]
    fn test_empty_context_block_is_empty() {
        let context = HealthContext {
            metrics: Vec::new(),
            markers: Vec::new(),
        };
        assert!(context.context_block().is_empty());
    }
}
