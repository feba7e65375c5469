//! 금 프리미엄 endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use premium_core::PremiumResult;

use crate::error::ApiResult;
use crate::state::AppState;

/// 국제 금 시세를 환율로 환산한 가격 대비 국내 금 시세의 프리미엄.
///
/// GET /api/gold_premium
pub async fn gold_premium(State(state): State<Arc<AppState>>) -> ApiResult<PremiumResult> {
    let result = state.service.gold_premium().await?;
    Ok(Json(result))
}
