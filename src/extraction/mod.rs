// ABOUTME: Tiered lab-marker extraction with completion-first, pattern-fallback design
// ABOUTME: Folds over an ordered tier list, short-circuiting on the first success
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Marker Extraction
//!
//! Turns unstructured lab-report text into validated [`MarkerCandidate`]s.
//! Extraction is a total operation: it never errors and always resolves to
//! a (possibly empty) list.
//!
//! Two tiers run in fixed order, first success wins:
//!
//! 1. **Completion tier** - one strict-JSON prompt to the configured
//!    [`CompletionProvider`]. Skipped without a call when no credential is
//!    configured; falls through on transport error, rate limiting, timeout,
//!    or a response that fails shape validation. A parseable empty array is
//!    a success and does not trigger fallback - the pattern tier is less
//!    precise, and re-running it after a well-formed "nothing found" answer
//!    would reintroduce the false positives this tier exists to avoid.
//! 2. **Pattern tier** - ordered named regexes; total by design.
//!
//! Each tier executes at most once per call. Retry and backoff belong to
//! the caller.

mod patterns;
mod sanitize;

pub use patterns::extract_with_patterns;
pub use sanitize::sanitize_response;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::constants::extraction::{EXTRACTION_MAX_TOKENS, EXTRACTION_TEMPERATURE};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::{ChatMessage, ChatRequest, CompletionProvider};
use crate::models::MarkerCandidate;

/// Extraction strategies in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionTier {
    /// Text-completion extraction via the configured provider
    Completion,
    /// Deterministic pattern matching
    Pattern,
}

/// Fixed tier order; the fold short-circuits on the first success
const TIER_ORDER: &[ExtractionTier] = &[ExtractionTier::Completion, ExtractionTier::Pattern];

/// Tiered marker extractor
///
/// Holds the optional completion provider and its time box. Constructed
/// once and shared; it is stateless across calls.
pub struct MarkerExtractor {
    provider: Option<Arc<dyn CompletionProvider>>,
    provider_timeout: Duration,
}

impl MarkerExtractor {
    /// Create an extractor with a completion provider for Tier 1
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, provider_timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            provider_timeout,
        }
    }

    /// Create an extractor with no provider credential
    ///
    /// Tier 1 is skipped without an attempted call; every extraction goes
    /// straight to the pattern tier.
    #[must_use]
    pub const fn without_provider() -> Self {
        Self {
            provider: None,
            provider_timeout: Duration::from_secs(0),
        }
    }

    /// Extract marker candidates from raw lab-report text
    ///
    /// Total function: never errors, always returns a (possibly empty)
    /// list. Tier failures are logged and absorbed.
    pub async fn extract(&self, text: &str) -> Vec<MarkerCandidate> {
        for tier in TIER_ORDER {
            match self.run_tier(*tier, text).await {
                Ok(candidates) => {
                    info!(
                        tier = ?tier,
                        count = candidates.len(),
                        "Extraction tier succeeded"
                    );
                    return candidates;
                }
                Err(error) if error.code == ErrorCode::ProviderUnavailable => {
                    debug!(tier = ?tier, "Tier skipped: no provider credential");
                }
                Err(error) => {
                    warn!(tier = ?tier, %error, "Extraction tier failed, falling through");
                }
            }
        }

        // Unreachable in practice: the pattern tier cannot fail
        Vec::new()
    }

    async fn run_tier(&self, tier: ExtractionTier, text: &str) -> AppResult<Vec<MarkerCandidate>> {
        match tier {
            ExtractionTier::Completion => self.completion_tier(text).await,
            ExtractionTier::Pattern => Ok(extract_with_patterns(text)),
        }
    }

    /// Tier 1: one strict-JSON completion call, time-boxed
    async fn completion_tier(&self, text: &str) -> AppResult<Vec<MarkerCandidate>> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(AppError::provider_unavailable)?;

        let request = ChatRequest::new(vec![
            ChatMessage::system(
                "You are a medical lab report parser. Return only valid JSON arrays of lab markers.",
            ),
            ChatMessage::user(extraction_prompt(text)),
        ])
        .with_temperature(EXTRACTION_TEMPERATURE)
        .with_max_tokens(EXTRACTION_MAX_TOKENS);

        let timeout_secs = self.provider_timeout.as_secs();
        let response = timeout(self.provider_timeout, provider.complete(&request))
            .await
            .map_err(|_| AppError::provider_timeout(timeout_secs))??;

        parse_candidates(&response.content)
    }
}

/// Build the Tier-1 extraction prompt
fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract lab markers from this lab report text. Return only a JSON array of objects \
         with this exact structure:\n\
         [{{\"marker\": \"marker_name\", \"value\": numeric_value, \"unit\": \"unit_string\"}}]\n\n\
         Rules:\n\
         - Only extract numeric lab values with clear units\n\
         - Standardize marker names (e.g., \"Hemoglobin\" not \"HGB\")\n\
         - Use standard units (e.g., \"g/dL\" not \"g/dl\")\n\
         - Skip reference ranges and non-numeric values\n\
         - Return empty array if no valid markers found\n\n\
         Lab report text:\n{text}\n\n\
         JSON array only:"
    )
}

/// Parse sanitized completion text into validated candidates
///
/// The outer shape must be a JSON array or the whole response is rejected.
/// Individual entries are validated independently; invalid ones are dropped
/// silently and never fail the batch.
fn parse_candidates(content: &str) -> AppResult<Vec<MarkerCandidate>> {
    let cleaned = sanitize_response(content);

    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| AppError::malformed_response(format!("response is not valid JSON: {e}")))?;

    let Value::Array(entries) = value else {
        return Err(AppError::malformed_response("response is not an array"));
    };

    let mut candidates = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<MarkerCandidate>(entry) {
            Ok(candidate) if candidate.is_valid() => candidates.push(candidate),
            Ok(candidate) => {
                debug!(marker = %candidate.marker, "Dropping candidate that failed field validation");
            }
            Err(error) => {
                debug!(%error, "Dropping entry that failed shape validation");
            }
        }
    }

    Ok(candidates)
}
