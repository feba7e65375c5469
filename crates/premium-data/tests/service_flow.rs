//! PremiumService 통합 테스트 (스텁 소스 사용).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use premium_core::{AppConfig, DomesticUnit, FetchError, PremiumError, SourceKind, SourcesConfig};
use premium_data::{PremiumService, RawSource, SourceRequest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 요청 종류별 고정 응답을 돌려주는 스텁.
struct FixedSource {
    international: Option<String>,
    domestic: Option<String>,
    rates: Option<String>,
    options: Option<String>,
    rate_fetches: AtomicUsize,
}

impl FixedSource {
    fn gold() -> Self {
        Self {
            international: Some(r#"{"data":{"interMarketPriceApiDTO":{"gold_ask":"2,000.0","gold_bid":"1999.5"}}}"#.to_string()),
            domestic: Some(r#"{"result":[{"closePrice":"90,000","tradePrice":"89,000"}]}"#.to_string()),
            rates: Some(r#"[{"result":1,"cur_unit":"USD","cur_nm":"미국 달러","deal_bas_r":"1,300.0"}]"#.to_string()),
            options: None,
            rate_fetches: AtomicUsize::new(0),
        }
    }
}

fn missing(kind: SourceKind) -> FetchError {
    FetchError::Network {
        source_kind: kind,
        message: "connection refused".to_string(),
    }
}

#[async_trait]
impl RawSource for FixedSource {
    async fn fetch(&self, request: &SourceRequest) -> Result<String, FetchError> {
        let body = match request {
            SourceRequest::InternationalGold => &self.international,
            SourceRequest::DomesticGold => &self.domestic,
            SourceRequest::ExchangeRates { .. } => {
                self.rate_fetches.fetch_add(1, Ordering::SeqCst);
                &self.rates
            }
            SourceRequest::OptionsPage => &self.options,
        };
        body.clone().ok_or_else(|| missing(request.kind()))
    }
}

fn config() -> AppConfig {
    AppConfig::new(SourcesConfig::with_api_key("test-key"))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn approx(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

#[tokio::test]
async fn test_gold_premium_end_to_end() {
    let source = Arc::new(FixedSource::gold());
    let service = PremiumService::new(source.clone(), &config()).unwrap();

    let result = service.gold_premium_on(date()).await.unwrap();

    assert_eq!(result.international_price_oz, dec!(2000.0));
    assert_eq!(result.korean_price_gram, dec!(90000));
    assert_eq!(result.exchange_rate, dec!(1300.0));
    assert!(approx(result.converted_price_krw_per_gram, dec!(83591.88), dec!(0.01)));
    assert!(approx(result.premium_percentage, dec!(7.666), dec!(0.001)));
    assert_eq!(source.rate_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_gold_premium_domestic_price_per_don() {
    let mut source = FixedSource::gold();
    source.domestic = Some(r#"{"result":[{"closePrice":"337,500"}]}"#.to_string());

    let mut config = config();
    config.premium.domestic_unit = DomesticUnit::Don;
    let service = PremiumService::new(Arc::new(source), &config).unwrap();

    let result = service.gold_premium_on(date()).await.unwrap();
    assert_eq!(result.korean_price_gram, dec!(90000));
}

#[tokio::test]
async fn test_gold_premium_fetch_failure_aborts() {
    let mut source = FixedSource::gold();
    source.domestic = None;
    let service = PremiumService::new(Arc::new(source), &config()).unwrap();

    let err = service.gold_premium_on(date()).await.unwrap_err();

    assert_eq!(err.code(), "FETCH_ERROR");
    assert!(matches!(err, PremiumError::Fetch(ref e) if e.kind() == SourceKind::Domestic));
}

#[tokio::test]
async fn test_gold_premium_unparseable_quote() {
    let mut source = FixedSource::gold();
    source.international = Some(r#"{"gold_ask":"0.00","gold_bid":"0.00"}"#.to_string());
    let service = PremiumService::new(Arc::new(source), &config()).unwrap();

    let err = service.gold_premium_on(date()).await.unwrap_err();
    assert_eq!(err.code(), "PARSE_ERROR");
}

#[tokio::test]
async fn test_gold_premium_rate_unavailable() {
    let mut source = FixedSource::gold();
    source.rates = Some("[]".to_string());
    let source = Arc::new(source);
    let service = PremiumService::new(source.clone(), &config()).unwrap();

    let err = service.gold_premium_on(date()).await.unwrap_err();

    assert_eq!(err.code(), "RESOLVE_ERROR");
    assert_eq!(source.rate_fetches.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn test_gold_premium_zero_domestic_price() {
    let mut source = FixedSource::gold();
    source.domestic = Some(r#"{"result":[{"closePrice":"0"}]}"#.to_string());
    let service = PremiumService::new(Arc::new(source), &config()).unwrap();

    let err = service.gold_premium_on(date()).await.unwrap_err();
    assert_eq!(err.code(), "PRECONDITION_ERROR");
}

#[tokio::test]
async fn test_gold_premium_out_of_range_quote() {
    let mut source = FixedSource::gold();
    source.international =
        Some(r#"{"gold_ask":"79,000,000,000,000,000,000,000,000,000"}"#.to_string());
    let service = PremiumService::new(Arc::new(source), &config()).unwrap();

    let err = service.gold_premium_on(date()).await.unwrap_err();
    assert_eq!(err.code(), "CALCULATION_ERROR");
}

#[tokio::test]
async fn test_gold_premium_auth_failure_reported() {
    let mut source = FixedSource::gold();
    source.rates = Some(r#"[{"result":3,"cur_unit":null,"cur_nm":null,"deal_bas_r":null}]"#.to_string());
    let service = PremiumService::new(Arc::new(source), &config()).unwrap();

    let err = service.gold_premium_on(date()).await.unwrap_err();
    assert_eq!(err.code(), "RESOLVE_ERROR");
    assert!(err.to_string().contains("인증코드 오류"));
}

#[tokio::test]
async fn test_put_call_ratio_from_html() {
    let mut source = FixedSource::gold();
    source.options = Some(
        "<html><body><div>Put/Call Vol Ratio</div><div>1.23</div>\
         <div>Put/Call Open Int Ratio</div><div>0.98</div>\
         <div>Put Volume</div><div>4,500</div>\
         <div>Call Volume</div><div>3,100</div></body></html>"
            .to_string(),
    );
    let service = PremiumService::new(Arc::new(source), &config()).unwrap();

    let ratios = service.put_call_ratio().await.unwrap();

    assert_eq!(ratios.volume_ratio, "1.23");
    assert_eq!(ratios.open_interest_ratio, "0.98");
    assert_eq!(ratios.put_volume, "4,500");
    assert_eq!(ratios.call_volume, "3,100");
}

#[tokio::test]
async fn test_put_call_ratio_incomplete_page() {
    let mut source = FixedSource::gold();
    source.options = Some("<html><body>Access denied</body></html>".to_string());
    let service = PremiumService::new(Arc::new(source), &config()).unwrap();

    let err = service.put_call_ratio().await.unwrap_err();
    assert_eq!(err.code(), "INCOMPLETE_EXTRACTION");
}

#[test]
fn test_invalid_timezone_is_config_error() {
    let mut config = config();
    config.resolver.timezone = "Mars/Olympus".to_string();
    assert!(PremiumService::new(Arc::new(FixedSource::gold()), &config).is_err());
}
