//! 외부 데이터 수집 및 요청 처리.
//!
//! 이 crate는 다음을 제공합니다:
//! - 외부 소스 조회 (`RawSource`, reqwest 기반 `HttpSource`)
//! - 국제/국내 금 시세 파서
//! - 날짜별 환율 조회기
//! - 옵션 페이지 풋/콜 지표 추출기
//! - 위 단계를 묶는 `PremiumService`

pub mod html;
pub mod options;
pub mod parser;
pub mod provider;
pub mod resolver;
pub mod service;

pub use html::flatten_html;
pub use options::extract_put_call_ratios;
pub use parser::{parse_decimal, ExtractionStrategy, QuoteParser};
pub use provider::{HttpSource, RawSource, SourceRequest};
pub use resolver::{find_rate, parse_rate_records, ExchangeRateResolver, RateRecord};
pub use service::PremiumService;
