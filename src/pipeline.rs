// ABOUTME: Lab-report processing pipeline - extract, validate, persist
// ABOUTME: The only code path that creates LabMarker rows
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Report Processing Pipeline
//!
//! Runs the tiered extractor over already-extracted report text and
//! persists the surviving candidates as [`LabMarker`] rows. Upload, PDF
//! parsing, and storage mechanics live with external collaborators; this
//! pipeline starts at text.
//!
//! A total extraction miss across both tiers is "nothing found", not an
//! error - the report is still processed, with zero markers. Only a store
//! failure is fatal, and only for this one operation.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::extraction::MarkerExtractor;
use crate::models::{LabMarker, MarkerCandidate};
use crate::store::HealthStore;

/// Outcome of processing one report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutcome {
    /// Report the markers belong to
    pub report_id: Uuid,
    /// How many markers were extracted and persisted
    pub markers_found: usize,
    /// The persisted candidates, for caller display
    pub markers: Vec<MarkerCandidate>,
}

/// Process one lab report's text for a user
///
/// Extraction is total; an empty candidate list short-circuits the store
/// write and reports success with zero markers.
///
/// # Errors
///
/// Returns [`crate::errors::ErrorCode::DataStoreError`] when persisting
/// the extracted markers fails. Extraction itself cannot fail.
pub async fn process_report<S: HealthStore + ?Sized>(
    store: &S,
    extractor: &MarkerExtractor,
    user_id: Uuid,
    report_id: Uuid,
    text: &str,
    taken_at: NaiveDate,
) -> AppResult<ReportOutcome> {
    let candidates = extractor.extract(text).await;

    if candidates.is_empty() {
        info!(user_id = %user_id, report_id = %report_id, "No markers found in report");
        return Ok(ReportOutcome {
            report_id,
            markers_found: 0,
            markers: Vec::new(),
        });
    }

    let now = Utc::now();
    let rows: Vec<LabMarker> = candidates
        .iter()
        .map(|candidate| LabMarker {
            id: Uuid::new_v4(),
            user_id,
            lab_report_id: report_id,
            marker_name: candidate.marker.clone(),
            value: candidate.value,
            unit: candidate.unit.clone(),
            taken_at,
            created_at: now,
            deleted_at: None,
        })
        .collect();

    store
        .insert_lab_markers(&rows)
        .await
        .map_err(|e| AppError::from(e).with_user_id(user_id))?;

    info!(
        user_id = %user_id,
        report_id = %report_id,
        markers = rows.len(),
        "Lab report processed"
    );

    Ok(ReportOutcome {
        report_id,
        markers_found: candidates.len(),
        markers: candidates,
    })
}
