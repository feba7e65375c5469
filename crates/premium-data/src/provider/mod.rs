//! 외부 데이터 소스.
//!
//! 각 요청 종류에 대해 원본 응답 텍스트를 돌려주는 [`RawSource`] 트레이트와
//! reqwest 기반 구현 [`HttpSource`]를 정의합니다.
//!
//! 테스트에서는 `RawSource`를 직접 구현한 스텁을 주입합니다.

pub mod http;

use async_trait::async_trait;
use chrono::NaiveDate;
use premium_core::{FetchError, SourceKind};

pub use http::HttpSource;

/// 소스에 보내는 요청 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRequest {
    /// 국제 금 시세
    InternationalGold,
    /// 국내 금 시세
    DomesticGold,
    /// 특정 날짜의 환율 목록
    ExchangeRates { date: NaiveDate },
    /// 옵션 체인 페이지
    OptionsPage,
}

impl SourceRequest {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceRequest::InternationalGold => SourceKind::International,
            SourceRequest::DomesticGold => SourceKind::Domestic,
            SourceRequest::ExchangeRates { .. } => SourceKind::ExchangeRate,
            SourceRequest::OptionsPage => SourceKind::OptionsPage,
        }
    }
}

/// 원본 응답 텍스트를 가져오는 소스.
#[async_trait]
pub trait RawSource: Send + Sync {
    /// 요청에 해당하는 응답 본문을 그대로 반환합니다.
    async fn fetch(&self, request: &SourceRequest) -> Result<String, FetchError>;
}
