//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 요청 간에 변경되는 상태는 없으며, 서비스와 메타데이터만 공유합니다.

use std::sync::Arc;

use premium_data::PremiumService;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 금 프리미엄/옵션 지표 서비스
    pub service: Arc<PremiumService>,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(service: PremiumService) -> Self {
        Self {
            service: Arc::new(service),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 주어진 소스와 기본 설정으로 서비스를 구성합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state(source: Arc<dyn premium_data::RawSource>) -> AppState {
    use premium_core::{AppConfig, SourcesConfig};

    let config = AppConfig::new(SourcesConfig::with_api_key("test-key"));
    let service =
        PremiumService::new(source, &config).expect("Failed to create PremiumService for test");
    AppState::new(service)
}
