//! API 라우트 정의.
//!
//! - `/health`: 헬스 체크
//! - `/api/gold_premium`: 금 프리미엄
//! - `/api/put_call_ratio`: 옵션 풋/콜 지표

pub mod gold;
pub mod health;
pub mod options;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::state::AppState;

pub use gold::gold_premium;
pub use health::{health_check, HealthResponse};
pub use options::put_call_ratio;

/// API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/gold_premium", get(gold_premium))
        .route("/api/put_call_ratio", get(put_call_ratio))
}
