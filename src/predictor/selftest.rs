//! Built-in sample sequences and the self-check that runs them.
//!
//! The samples double as documentation (served by `GET /samples`, printed
//! by the REPL) and as a smoke test of the predictor (`echo-chamber check`).

use serde::Serialize;
use tracing::{info, warn};

use crate::messages;
use crate::predictor::SequencePredictor;
use crate::types::{ErrorKind, Locale};

/// A known-good arithmetic progression and its next term.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Stable key; the display name is looked up per locale.
    pub key: &'static str,
    pub sequence: &'static [f64],
    pub expected: f64,
}

pub const SAMPLES: &[Sample] = &[
    Sample { key: "basic", sequence: &[3.0, 6.0, 9.0, 12.0], expected: 15.0 },
    Sample { key: "even", sequence: &[2.0, 4.0, 6.0, 8.0, 10.0], expected: 12.0 },
    Sample { key: "decreasing", sequence: &[20.0, 15.0, 10.0, 5.0], expected: 0.0 },
    Sample { key: "large", sequence: &[100.0, 200.0, 300.0, 400.0], expected: 500.0 },
    Sample { key: "negative", sequence: &[-10.0, -5.0, 0.0, 5.0, 10.0], expected: 15.0 },
    Sample { key: "step_one", sequence: &[5.0, 6.0, 7.0, 8.0], expected: 9.0 },
    Sample { key: "two_numbers", sequence: &[5.0, 10.0], expected: 15.0 },
    Sample { key: "constant", sequence: &[7.0, 7.0, 7.0, 7.0], expected: 7.0 },
];

/// Powers of two: must be rejected.
const NON_ARITHMETIC: &[f64] = &[1.0, 2.0, 4.0, 8.0];

/// A sample rendered for clients.
#[derive(Debug, Clone, Serialize)]
pub struct SampleView {
    pub key: &'static str,
    pub name: &'static str,
    pub sequence: &'static [f64],
    pub expected: f64,
}

impl Sample {
    pub fn view(&self, locale: Locale) -> SampleView {
        SampleView {
            key: self.key,
            name: messages::sample_name(locale, self.key),
            sequence: self.sequence,
            expected: self.expected,
        }
    }
}

pub fn sample_views(locale: Locale) -> Vec<SampleView> {
    SAMPLES.iter().map(|s| s.view(locale)).collect()
}

// ---------------------------------------------------------------------------
// Self-check
// ---------------------------------------------------------------------------

/// What the predictor did with one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Outcome {
    Predicted(f64),
    Rejected(ErrorKind),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResult {
    pub name: String,
    pub sequence: Vec<f64>,
    pub expected: Outcome,
    pub outcome: Outcome,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfCheckReport {
    pub cases: Vec<CaseResult>,
    pub passed: usize,
    pub failed: usize,
}

impl SelfCheckReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Percentage of passing cases (0–100).
    pub fn success_rate(&self) -> f64 {
        let total = self.passed + self.failed;
        if total == 0 {
            return 0.0;
        }
        self.passed as f64 / total as f64 * 100.0
    }
}

/// Run every sample plus the negative case through a fresh predictor.
pub fn run_self_check(locale: Locale) -> SelfCheckReport {
    let mut predictor = SequencePredictor::new();

    let mut cases: Vec<(String, &[f64], Outcome)> = SAMPLES
        .iter()
        .map(|s| {
            (
                messages::sample_name(locale, s.key).to_string(),
                s.sequence,
                Outcome::Predicted(s.expected),
            )
        })
        .collect();
    cases.push((
        messages::sample_name(locale, "non_arithmetic").to_string(),
        NON_ARITHMETIC,
        Outcome::Rejected(ErrorKind::NotArithmetic),
    ));

    let results: Vec<CaseResult> = cases
        .into_iter()
        .map(|(name, sequence, expected)| {
            let outcome = match predictor.predict_next(sequence) {
                Ok(rec) => Outcome::Predicted(rec.predicted_next),
                Err(kind) => Outcome::Rejected(kind),
            };
            let passed = outcome == expected;
            if !passed {
                warn!(case = %name, ?expected, ?outcome, "Self-check case failed");
            }
            CaseResult {
                name,
                sequence: sequence.to_vec(),
                expected,
                outcome,
                passed,
            }
        })
        .collect();

    let passed = results.iter().filter(|c| c.passed).count();
    let failed = results.len() - passed;
    info!(passed, failed, "Self-check complete");

    SelfCheckReport {
        cases: results,
        passed,
        failed,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
