//! 금 프리미엄 API 서버.
//!
//! Axum 기반 REST API를 제공합니다:
//! - `GET /api/gold_premium`: 국제/국내 금 시세와 환율로 계산한 김치 프리미엄
//! - `GET /api/put_call_ratio`: 옵션 체인 페이지의 풋/콜 지표
//! - `GET /health`: 헬스 체크

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use state::AppState;
