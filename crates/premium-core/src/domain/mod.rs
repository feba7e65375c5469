//! 도메인 모델.
//!
//! - [`quote`]: 시세(Quote), 환율(ExchangeRate), 데이터 소스 구분
//! - [`premium`]: 프리미엄 계산기
//! - [`options`]: 풋/콜 비율 지표

pub mod options;
pub mod premium;
pub mod quote;

pub use options::PutCallRatios;
pub use premium::{
    calculate_premium, converted_price_krw_per_gram, PremiumResult, DON_TO_GRAM, OUNCE_TO_GRAM,
};
pub use quote::{DomesticUnit, ExchangeRate, PriceUnit, Quote, SourceKind};
