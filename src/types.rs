//! Shared types for the Echo Chamber.
//!
//! These types form the data model used across the predictor, the HTTP
//! server and the REPL: the sequence error taxonomy, prediction records,
//! locales, and the parsers that turn raw input into a numeric sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a sequence was rejected.
///
/// Serialized as the bare variant name (`"NotArithmetic"`), which is the
/// tag clients match on. Human-readable text lives in [`crate::messages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum ErrorKind {
    #[error("input is not an array of numbers")]
    NotAnArray,

    #[error("sequence must contain at least 2 numbers")]
    TooShort,

    #[error("sequence contains a value that is not a finite number")]
    NonNumeric,

    #[error("sequence is not an arithmetic progression")]
    NotArithmetic,
}

impl ErrorKind {
    pub const ALL: &'static [ErrorKind] = &[
        ErrorKind::NotAnArray,
        ErrorKind::TooShort,
        ErrorKind::NonNumeric,
        ErrorKind::NotArithmetic,
    ];
}

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Language used for user-facing messages.
///
/// Deserialization goes through [`FromStr`](std::str::FromStr), so config
/// files accept the same spellings as `--locale` and `?lang=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Es => write!(f, "es"),
        }
    }
}

/// Parse a locale tag (case-insensitive). Region suffixes like `es-ES` are
/// accepted.
impl std::str::FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "en" | "english" => Ok(Locale::En),
            "es" | "spanish" | "español" | "espanol" => Ok(Locale::Es),
            _ => Err(anyhow::anyhow!("Unknown locale: {s}")),
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Validation & prediction results
// ---------------------------------------------------------------------------

/// A sequence that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    pub common_difference: f64,
    /// `differences[i] = sequence[i + 1] - sequence[i]`
    pub differences: Vec<f64>,
}

/// One successful prediction, as stored in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: Uuid,
    pub sequence: Vec<f64>,
    pub common_difference: f64,
    pub predicted_next: f64,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn new(sequence: Vec<f64>, common_difference: f64, predicted_next: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            common_difference,
            predicted_next,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for PredictionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] d={} next={} ({})",
            join_numbers(&self.sequence),
            self.common_difference,
            self.predicted_next,
            self.created_at.format("%H:%M:%S"),
        )
    }
}

/// Render numbers as `3, 6, 9`.
pub fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Minimum number of elements needed to find a common difference.
pub const MIN_SEQUENCE_LEN: usize = 2;

/// Turn an arbitrary JSON value into a numeric sequence.
///
/// Checks run in a fixed order: shape, then length, then element types.
/// A missing field arrives here as `Value::Null` and is `NotAnArray`.
pub fn parse_json_sequence(value: &serde_json::Value) -> Result<Vec<f64>, ErrorKind> {
    let items = value.as_array().ok_or(ErrorKind::NotAnArray)?;

    if items.len() < MIN_SEQUENCE_LEN {
        return Err(ErrorKind::TooShort);
    }

    items
        .iter()
        .map(|item| {
            item.as_f64()
                .filter(|n| n.is_finite())
                .ok_or(ErrorKind::NonNumeric)
        })
        .collect()
}

/// Parse a line like `3, 6, 9, 12` (commas and/or whitespace).
pub fn parse_text_sequence(input: &str) -> Result<Vec<f64>, ErrorKind> {
    let tokens: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() < MIN_SEQUENCE_LEN {
        return Err(ErrorKind::TooShort);
    }

    tokens
        .iter()
        .map(|t| {
            t.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or(ErrorKind::NonNumeric)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
