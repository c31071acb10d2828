//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ServerState>`.
//! Sequence failures are answered with `200` and a tagged body
//! (`success: false` / `valid: false`); only malformed requests get a 4xx.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::messages::{self, Text};
use crate::predictor::selftest::{self, SampleView, SelfCheckReport};
use crate::predictor::{self, SequencePredictor};
use crate::types::{parse_json_sequence, ErrorKind, Locale, PredictionRecord};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
///
/// The predictor sits behind one lock: `predict` holds the write half for
/// validate-and-append, so concurrent requests never lose a record.
pub struct ServerState {
    pub predictor: RwLock<SequencePredictor>,
    /// Locale used when a request carries no `?lang=`.
    pub locale: Locale,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(predictor: SequencePredictor, locale: Locale) -> Self {
        Self {
            predictor: RwLock::new(predictor),
            locale,
            started_at: Utc::now(),
        }
    }
}

pub type AppState = Arc<ServerState>;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    /// Requested locale, or `default` when absent or unrecognised.
    pub fn resolve(&self, default: Locale) -> Locale {
        self.lang
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(default)
    }
}

/// Body of `POST /predict` and `POST /validate`.
///
/// `sequence` stays untyped so that shape errors surface as
/// [`ErrorKind`] tags instead of extractor rejections.
#[derive(Debug, Deserialize)]
pub struct SequenceRequest {
    #[serde(default)]
    pub sequence: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_difference: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_count: Option<usize>,
    /// On `NotArithmetic`, the non-uniform differences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differences: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_difference: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differences: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub records: Vec<PredictionRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub removed: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub title: String,
    pub records: usize,
    pub version: String,
    pub locale: Locale,
    pub uptime_secs: i64,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
    Json(req): Json<SequenceRequest>,
) -> Json<PredictResponse> {
    let locale = query.resolve(state.locale);

    let parsed = parse_json_sequence(&req.sequence);
    let outcome = match &parsed {
        Ok(sequence) => {
            let mut predictor = state.predictor.write().await;
            predictor
                .predict_next(sequence)
                .map(|record| (record, predictor.len()))
        }
        Err(kind) => Err(*kind),
    };

    Json(match outcome {
        Ok((record, count)) => PredictResponse {
            success: true,
            common_difference: Some(record.common_difference),
            prediction: Some(record.predicted_next),
            history_count: Some(count),
            differences: None,
            error: None,
            message: messages::prediction(locale, record.predicted_next),
        },
        Err(kind) => {
            let differences = predictor::rejected_differences(kind, parsed.as_deref().ok());
            PredictResponse {
                success: false,
                common_difference: None,
                prediction: None,
                history_count: None,
                message: messages::rejection(locale, kind, differences.as_deref()),
                differences,
                error: Some(kind),
            }
        }
    })
}

/// POST /validate
///
/// Pure check; takes no lock.
pub async fn validate(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
    Json(req): Json<SequenceRequest>,
) -> Json<ValidateResponse> {
    let locale = query.resolve(state.locale);

    let parsed = parse_json_sequence(&req.sequence);
    let outcome = parsed.as_deref().map_err(|kind| *kind).and_then(predictor::validate);

    Json(match outcome {
        Ok(progression) => ValidateResponse {
            valid: true,
            common_difference: Some(progression.common_difference),
            differences: Some(progression.differences),
            error: None,
            message: messages::text(locale, Text::ValidProgression).to_string(),
        },
        Err(kind) => {
            let differences = predictor::rejected_differences(kind, parsed.as_deref().ok());
            ValidateResponse {
                valid: false,
                common_difference: None,
                message: messages::rejection(locale, kind, differences.as_deref()),
                differences,
                error: Some(kind),
            }
        }
    })
}

/// GET /history
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let predictor = state.predictor.read().await;
    Json(HistoryResponse {
        count: predictor.len(),
        records: predictor.history().to_vec(),
    })
}

/// POST /history/clear
pub async fn clear_history(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Json<ClearResponse> {
    let locale = query.resolve(state.locale);
    let removed = state.predictor.write().await.clear_history();
    Json(ClearResponse {
        removed,
        message: messages::cleared(locale, removed),
    })
}

/// GET /status
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Json<StatusResponse> {
    let locale = query.resolve(state.locale);
    let records = state.predictor.read().await.len();
    Json(StatusResponse {
        status: "connected".to_string(),
        title: messages::text(locale, Text::Title).to_string(),
        records,
        version: env!("CARGO_PKG_VERSION").to_string(),
        locale,
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// GET /samples
pub async fn get_samples(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Json<Vec<SampleView>> {
    Json(selftest::sample_views(query.resolve(state.locale)))
}

/// GET /selfcheck
///
/// Runs against a private predictor; the shared history is not touched.
pub async fn get_self_check(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Json<SelfCheckReport> {
    Json(selftest::run_self_check(query.resolve(state.locale)))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> AppState {
        Arc::new(ServerState::new(SequencePredictor::new(), Locale::En))
    }

    fn body(sequence: serde_json::Value) -> Json<SequenceRequest> {
        Json(SequenceRequest { sequence })
    }

    fn no_lang() -> Query<LangQuery> {
        Query(LangQuery::default())
    }

    #[test]
    fn test_lang_query_resolve() {
        let q = LangQuery { lang: Some("es".into()) };
        assert_eq!(q.resolve(Locale::En), Locale::Es);
        let q = LangQuery { lang: Some("klingon".into()) };
        assert_eq!(q.resolve(Locale::Es), Locale::Es);
        assert_eq!(LangQuery::default().resolve(Locale::En), Locale::En);
    }

    #[test]
    fn test_sequence_request_missing_field_is_null() {
        let req: SequenceRequest = serde_json::from_str("{}").unwrap();
        assert!(req.sequence.is_null());
    }

    #[test]
    fn test_predict_response_skips_empty_fields() {
        let resp = PredictResponse {
            success: false,
            common_difference: None,
            prediction: None,
            history_count: None,
            differences: None,
            error: Some(ErrorKind::TooShort),
            message: "x".into(),
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["error"], "TooShort");
        assert!(v.get("prediction").is_none());
        assert!(v.get("commonDifference").is_none());
    }

    #[tokio::test]
    async fn test_predict_handler_success() {
        let state = test_state();
        let Json(resp) = predict(State(state.clone()), no_lang(), body(json!([3, 6, 9, 12]))).await;
        assert!(resp.success);
        assert_eq!(resp.common_difference, Some(3.0));
        assert_eq!(resp.prediction, Some(15.0));
        assert_eq!(resp.history_count, Some(1));
        assert_eq!(state.predictor.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_predict_handler_rejects_without_side_effect() {
        let state = test_state();
        let Json(resp) = predict(State(state.clone()), no_lang(), body(json!([1, 2, 4, 8]))).await;
        assert!(!resp.success);
        assert_eq!(resp.error, Some(ErrorKind::NotArithmetic));
        assert_eq!(resp.differences, Some(vec![1.0, 2.0, 4.0]));
        assert!(resp.message.ends_with("Differences are: 1, 2, 4"));
        assert!(state.predictor.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_predict_handler_localized_error() {
        let state = test_state();
        let q = Query(LangQuery { lang: Some("es".into()) });
        let Json(resp) = predict(State(state), q, body(json!([5]))).await;
        assert_eq!(resp.error, Some(ErrorKind::TooShort));
        assert_eq!(resp.message, messages::error(Locale::Es, ErrorKind::TooShort));
    }

    #[tokio::test]
    async fn test_validate_handler_never_records() {
        let state = test_state();
        for _ in 0..3 {
            let Json(resp) =
                validate(State(state.clone()), no_lang(), body(json!([20, 15, 10, 5]))).await;
            assert!(resp.valid);
            assert_eq!(resp.common_difference, Some(-5.0));
        }
        assert!(state.predictor.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_validate_handler_not_an_array() {
        let Json(resp) = validate(State(test_state()), no_lang(), body(json!("3,6,9"))).await;
        assert!(!resp.valid);
        assert_eq!(resp.error, Some(ErrorKind::NotAnArray));
        assert_eq!(resp.differences, None);
    }

    #[tokio::test]
    async fn test_validate_handler_reports_differences() {
        let q = Query(LangQuery { lang: Some("es".into()) });
        let Json(resp) = validate(State(test_state()), q, body(json!([1, 3, 4]))).await;
        assert!(!resp.valid);
        assert_eq!(resp.error, Some(ErrorKind::NotArithmetic));
        assert_eq!(resp.differences, Some(vec![2.0, 1.0]));
        assert!(resp.message.ends_with("Diferencias: 2, 1"));
    }

    #[tokio::test]
    async fn test_history_and_clear_handlers() {
        let state = test_state();
        predict(State(state.clone()), no_lang(), body(json!([1, 2]))).await;
        predict(State(state.clone()), no_lang(), body(json!([2, 4]))).await;

        let Json(history) = get_history(State(state.clone())).await;
        assert_eq!(history.count, 2);
        assert_eq!(history.records[0].sequence, vec![1.0, 2.0]);
        assert_eq!(history.records[1].sequence, vec![2.0, 4.0]);

        let Json(cleared) = clear_history(State(state.clone()), no_lang()).await;
        assert_eq!(cleared.removed, 2);

        let Json(history) = get_history(State(state)).await;
        assert_eq!(history.count, 0);
    }

    #[tokio::test]
    async fn test_status_handler() {
        let state = test_state();
        let Json(resp) = get_status(State(state), no_lang()).await;
        assert_eq!(resp.status, "connected");
        assert_eq!(resp.records, 0);
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_self_check_handler_leaves_shared_history() {
        let state = test_state();
        let Json(report) = get_self_check(State(state.clone()), no_lang()).await;
        assert!(report.all_passed());
        assert!(state.predictor.read().await.is_empty());
    }
}
