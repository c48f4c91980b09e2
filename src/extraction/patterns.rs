// ABOUTME: Pattern-matching extraction tier over raw lab-report text
// ABOUTME: Ordered named regexes, each bound to one marker name and canonical unit
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Pattern Tier
//!
//! The last extraction tier: tolerant, deterministic regex matching that
//! cannot fail. Each pattern is bound to one standardized marker name and
//! canonical unit; patterns run in order and the first match per marker
//! wins. Name-first patterns come before value-first fallbacks so labeled
//! rows beat loose matches.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::MarkerCandidate;

/// One named pattern bound to a standardized marker and unit
struct MarkerPattern {
    /// Standardized marker name assigned to a match
    marker: &'static str,
    /// Canonical unit assigned to a match
    unit: &'static str,
    /// Pattern with the numeric value in capture group 1
    /// Stored as Option to handle compilation failures gracefully (should never fail for static patterns)
    regex: Option<Regex>,
}

fn pattern(marker: &'static str, unit: &'static str, expr: &str) -> MarkerPattern {
    MarkerPattern {
        marker,
        unit,
        regex: Regex::new(expr).ok(),
    }
}

/// Ordered pattern table; first match per marker wins
static PATTERNS: LazyLock<Vec<MarkerPattern>> = LazyLock::new(|| {
    vec![
        // Blood count
        pattern("Hemoglobin", "g/dL", r"(?i)hemoglobin[\s\w]*?(\d+\.?\d*)\s*g/dL"),
        pattern(
            "RBC Count",
            "million/cmm",
            r"(?i)RBC\s*Count[\s\w]*?(\d+\.?\d*)\s*(?:million/cmm|M/uL)",
        ),
        pattern("WBC Count", "/cmm", r"(?i)WBC\s*Count[\s\w]*?(\d+)\s*(?:/cmm|K/uL)"),
        pattern(
            "Platelet Count",
            "/cmm",
            r"(?i)platelet\s*Count[\s\w]*?(\d+)\s*(?:/cmm|K/uL)",
        ),
        pattern("Hematocrit", "%", r"(?i)hematocrit[\s\w]*?(\d+\.?\d*)\s*%"),
        pattern("MCV", "fL", r"(?i)\bMCV\b[\s\w]*?(\d+\.?\d*)\s*fL"),
        pattern("MCH", "pg", r"(?i)\bMCH\b[\s\w]*?(\d+\.?\d*)\s*pg"),
        pattern("MCHC", "g/dL", r"(?i)\bMCHC\b[\s\w]*?(\d+\.?\d*)\s*g/dL"),
        pattern("ESR", "mm/hr", r"(?i)\bESR\b[\s\w]*?(\d+)\s*mm/hr"),
        // Metabolic
        pattern("Glucose", "mg/dL", r"(?i)glucose[\s\w]*?(\d+\.?\d*)\s*mg/dL"),
        pattern("HbA1c", "%", r"(?i)\bHbA1c\b[\s\w]*?(\d+\.?\d*)\s*%"),
        // Lipid profile
        pattern(
            "HDL Cholesterol",
            "mg/dL",
            r"(?i)\bHDL\b[\s\w]*?(\d+\.?\d*)\s*mg/dL",
        ),
        pattern(
            "LDL Cholesterol",
            "mg/dL",
            r"(?i)\bLDL\b[\s\w]*?(\d+\.?\d*)\s*mg/dL",
        ),
        pattern(
            "Triglycerides",
            "mg/dL",
            r"(?i)triglycerides?[\s\w]*?(\d+\.?\d*)\s*mg/dL",
        ),
        // Requires the "total" qualifier so HDL/LDL rows never double-match
        pattern(
            "Total Cholesterol",
            "mg/dL",
            r"(?i)total\s+cholesterol[\s\w]*?(\d+\.?\d*)\s*mg/dL",
        ),
        // Value-first fallbacks for table layouts that put the number before the label
        pattern("Hemoglobin", "g/dL", r"(?i)(\d+\.?\d*)\s*g/dL[^\n]*?hemoglobin"),
        pattern(
            "RBC Count",
            "million/cmm",
            r"(?i)(\d+\.?\d*)\s*million/cmm[^\n]*?RBC",
        ),
        pattern("Hematocrit", "%", r"(?i)(\d+\.?\d*)\s*%[^\n]*?hematocrit"),
    ]
});

/// Extract marker candidates by pattern matching
///
/// Total by design: any input, including empty or garbage text, yields a
/// (possibly empty) list. Patterns that failed to compile are skipped.
#[must_use]
pub fn extract_with_patterns(text: &str) -> Vec<MarkerCandidate> {
    let mut seen: HashSet<&'static str> = HashSet::new();
    let mut candidates = Vec::new();

    for entry in PATTERNS.iter() {
        if seen.contains(entry.marker) {
            continue;
        }
        let Some(regex) = entry.regex.as_ref() else {
            continue;
        };
        let Some(captures) = regex.captures(text) else {
            continue;
        };
        let Some(value) = captures.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) else {
            continue;
        };

        let candidate = MarkerCandidate {
            marker: entry.marker.to_owned(),
            value,
            unit: entry.unit.to_owned(),
        };
        if candidate.is_valid() {
            seen.insert(entry.marker);
            candidates.push(candidate);
        }
    }

    debug!(count = candidates.len(), "Pattern tier extraction complete");
    candidates
}
