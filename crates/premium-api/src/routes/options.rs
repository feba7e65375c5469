//! 옵션 풋/콜 지표 endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use premium_core::PutCallRatios;

use crate::error::ApiResult;
use crate::state::AppState;

/// 옵션 체인 페이지에서 추출한 풋/콜 거래량/미결제약정 지표.
///
/// GET /api/put_call_ratio
pub async fn put_call_ratio(State(state): State<Arc<AppState>>) -> ApiResult<PutCallRatios> {
    let ratios = state.service.put_call_ratio().await?;
    Ok(Json(ratios))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_api_router;
    use crate::routes::test_support::{BlockedOptionsSource, FailingSource, StubSource};
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(state: AppState) -> (StatusCode, Value) {
        let app = create_api_router().with_state(Arc::new(state));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/put_call_ratio")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_put_call_ratio_success() {
        let (status, json) = get_json(create_test_state(Arc::new(StubSource))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["volume_ratio"], "1.23");
        assert_eq!(json["open_interest_ratio"], "0.98");
        assert_eq!(json["put_volume"], "4,500");
        assert_eq!(json["call_volume"], "3,100");
    }

    #[tokio::test]
    async fn test_put_call_ratio_incomplete_page() {
        let (status, json) = get_json(create_test_state(Arc::new(BlockedOptionsSource))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INCOMPLETE_EXTRACTION");
        assert_eq!(json["details"]["found_count"], 1);
        assert_eq!(json["page_content_sample"], "Access denied. Put Volume 12");
    }

    #[tokio::test]
    async fn test_put_call_ratio_fetch_failure() {
        let (status, json) = get_json(create_test_state(Arc::new(FailingSource))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "FETCH_ERROR");
        assert!(json["error"].as_str().unwrap().contains("options_page"));
    }
}
