//! Sequence predictor — arithmetic progression detection and the
//! prediction history.
//!
//! `validate` is a pure function over a numeric slice. `SequencePredictor`
//! wraps it with an append-only history: every successful prediction is
//! recorded, failed ones never are.

pub mod selftest;

use tracing::{debug, info};

use crate::types::{ErrorKind, PredictionRecord, Progression, MIN_SEQUENCE_LEN};

/// Check whether `sequence` is an arithmetic progression.
///
/// Differences are compared exactly. A difference that overflows to
/// infinity is treated as `NotArithmetic`.
pub fn validate(sequence: &[f64]) -> Result<Progression, ErrorKind> {
    if sequence.len() < MIN_SEQUENCE_LEN {
        return Err(ErrorKind::TooShort);
    }

    if sequence.iter().any(|n| !n.is_finite()) {
        return Err(ErrorKind::NonNumeric);
    }

    let differences = differences(sequence);
    let common_difference = differences[0];

    if !common_difference.is_finite() || differences.iter().any(|&d| d != common_difference) {
        debug!(differences = ?differences, "Sequence rejected: differences are not uniform");
        return Err(ErrorKind::NotArithmetic);
    }

    Ok(Progression {
        common_difference,
        differences,
    })
}

/// `differences[i] = sequence[i + 1] - sequence[i]`
pub fn differences(sequence: &[f64]) -> Vec<f64> {
    sequence.windows(2).map(|w| w[1] - w[0]).collect()
}

/// The differences behind a `NotArithmetic` rejection, for diagnostics.
/// `None` for every other kind, or when the input never parsed.
pub fn rejected_differences(kind: ErrorKind, sequence: Option<&[f64]>) -> Option<Vec<f64>> {
    match (kind, sequence) {
        (ErrorKind::NotArithmetic, Some(seq)) => Some(differences(seq)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// Validates sequences, predicts the next term, and remembers every
/// successful prediction in insertion order.
#[derive(Debug, Default)]
pub struct SequencePredictor {
    history: Vec<PredictionRecord>,
}

impl SequencePredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate without recording anything.
    pub fn validate(&self, sequence: &[f64]) -> Result<Progression, ErrorKind> {
        validate(sequence)
    }

    /// Predict the next term and append it to the history.
    ///
    /// On failure the history is untouched.
    pub fn predict_next(&mut self, sequence: &[f64]) -> Result<PredictionRecord, ErrorKind> {
        let progression = validate(sequence).inspect_err(|kind| {
            debug!(len = sequence.len(), error = ?kind, "Prediction rejected");
        })?;

        let last = sequence[sequence.len() - 1];
        let predicted_next = last + progression.common_difference;
        if !predicted_next.is_finite() {
            debug!(last, d = progression.common_difference, "Prediction overflows");
            return Err(ErrorKind::NotArithmetic);
        }

        let record = PredictionRecord::new(
            sequence.to_vec(),
            progression.common_difference,
            predicted_next,
        );
        self.history.push(record.clone());

        info!(
            len = sequence.len(),
            common_difference = record.common_difference,
            predicted_next = record.predicted_next,
            history = self.history.len(),
            "Prediction recorded"
        );

        Ok(record)
    }

    /// All past predictions, oldest first.
    pub fn history(&self) -> &[PredictionRecord] {
        &self.history
    }

    /// Drop all records. Returns how many were removed.
    pub fn clear_history(&mut self) -> usize {
        let removed = self.history.len();
        self.history.clear();
        info!(removed, "History cleared");
        removed
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
