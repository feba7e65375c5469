//! API 에러 응답.
//!
//! 요청 처리 중 발생한 모든 [`PremiumError`]는 HTTP 500과 구조화된 JSON으로
//! 변환됩니다.
//!
//! # 예시
//!
//! ```json
//! {
//!   "error": "international_gold 응답 파싱 실패: 알려진 필드를 찾을 수 없습니다: gold_ask, gold_bid",
//!   "code": "PARSE_ERROR",
//!   "details": { "source": "international_gold", "raw_sample": "{\"data\":{}}" },
//!   "timestamp": 1738300800
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use premium_core::{ExtractionError, FetchError, PremiumError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

/// API 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 사람이 읽을 수 있는 에러 메시지
    pub error: String,
    /// 에러 코드 (예: "FETCH_ERROR", "PARSE_ERROR")
    pub code: String,
    /// 추가 진단 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 옵션 페이지 추출 실패 시 검색한 텍스트의 앞부분
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_content_sample: Option<String>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
            page_content_sample: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_page_content_sample(mut self, sample: impl Into<String>) -> Self {
        self.page_content_sample = Some(sample.into());
        self
    }
}

impl From<&PremiumError> for ApiErrorResponse {
    fn from(err: &PremiumError) -> Self {
        let response = ApiErrorResponse::new(err.code(), err.to_string());

        match err {
            PremiumError::Fetch(e) => response.with_details(fetch_details(e)),
            PremiumError::Parse(e) => response.with_details(json!({
                "source": e.source_kind.as_str(),
                "reason": e.reason,
                "raw_sample": e.raw_sample,
            })),
            PremiumError::Resolve(premium_core::ResolveError::AttemptsExhausted {
                currency,
                attempts,
                last_reason,
            }) => response.with_details(json!({
                "currency": currency,
                "attempts": attempts,
                "last_reason": last_reason,
            })),
            PremiumError::Extraction(ExtractionError::Incomplete {
                found_count,
                sample,
            }) => response
                .with_details(json!({ "found_count": found_count, "expected_count": 4 }))
                .with_page_content_sample(sample.clone()),
            PremiumError::Precondition(e) => response.with_details(json!({
                "field": e.field,
                "value": e.value.to_string(),
            })),
            PremiumError::Calculation(e) => response.with_details(json!({ "field": e.field })),
        }
    }
}

fn fetch_details(err: &FetchError) -> Value {
    match err {
        FetchError::Network { source_kind, .. } => json!({
            "source": source_kind.as_str(),
            "kind": "network",
        }),
        FetchError::Timeout {
            source_kind,
            timeout_secs,
        } => json!({
            "source": source_kind.as_str(),
            "kind": "timeout",
            "timeout_secs": timeout_secs,
        }),
        FetchError::Status {
            source_kind,
            status,
        } => json!({
            "source": source_kind.as_str(),
            "kind": "status",
            "status": status,
        }),
    }
}

/// 핸들러 에러 타입.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorResponse,
}

impl From<PremiumError> for ApiError {
    fn from(err: PremiumError) -> Self {
        error!(code = err.code(), error = %err, "요청 처리 실패");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ApiErrorResponse::from(&err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// API 핸들러 Result 타입.
pub type ApiResult<T> = Result<Json<T>, ApiError>;
