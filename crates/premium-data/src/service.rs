//! 요청 단위 조율.
//!
//! 한 요청은 하나의 순차적인 흐름으로 처리됩니다:
//! - 금 프리미엄: 국제 시세 → 국내 시세 → 환율 조회 → 계산
//! - 풋/콜 비율: 옵션 페이지 → 평문 변환 → 지표 추출
//!
//! 어느 단계든 실패하면 즉시 중단하며 부분 결과는 반환하지 않습니다.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use premium_core::{
    calculate_premium, AppConfig, ConfigError, DomesticUnit, PremiumResult, PutCallRatios,
    ServiceResult,
};
use tracing::{debug, info};

use crate::html::flatten_html;
use crate::options::extract_put_call_ratios;
use crate::parser::QuoteParser;
use crate::provider::{RawSource, SourceRequest};
use crate::resolver::ExchangeRateResolver;

/// 금 프리미엄 및 옵션 지표 서비스.
pub struct PremiumService {
    source: Arc<dyn RawSource>,
    international: QuoteParser,
    domestic: QuoteParser,
    currency: String,
    max_attempts: u32,
    timezone: Tz,
    domestic_unit: DomesticUnit,
    sample_limit: usize,
}

impl PremiumService {
    /// 설정으로 서비스를 생성합니다. 시간대 이름이 잘못되면 에러입니다.
    pub fn new(source: Arc<dyn RawSource>, config: &AppConfig) -> Result<Self, ConfigError> {
        let timezone: Tz = config.resolver.timezone.parse().map_err(|e| {
            ConfigError::Invalid(format!(
                "resolver.timezone '{}': {}",
                config.resolver.timezone, e
            ))
        })?;
        let sample_limit = config.diagnostics.sample_limit;

        Ok(Self {
            source,
            international: QuoteParser::international(sample_limit),
            domestic: QuoteParser::domestic(sample_limit),
            currency: config.resolver.currency.clone(),
            max_attempts: config.resolver.max_attempts,
            timezone,
            domestic_unit: config.premium.domestic_unit,
            sample_limit,
        })
    }

    /// 설정된 시간대 기준 오늘 날짜.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// 오늘 기준 금 프리미엄을 계산합니다.
    pub async fn gold_premium(&self) -> ServiceResult<PremiumResult> {
        self.gold_premium_on(self.today()).await
    }

    /// `today`부터 환율을 조회하여 금 프리미엄을 계산합니다.
    pub async fn gold_premium_on(&self, today: NaiveDate) -> ServiceResult<PremiumResult> {
        let raw = self.source.fetch(&SourceRequest::InternationalGold).await?;
        let international = self.international.parse(&raw)?;
        debug!(price = %international.value(), "국제 금 시세 (USD/oz)");

        let raw = self.source.fetch(&SourceRequest::DomesticGold).await?;
        let domestic = self.domestic.parse(&raw)?;
        let korean_price_gram = self.domestic_unit.to_per_gram(domestic.value());
        debug!(
            price = %domestic.value(),
            unit = ?self.domestic_unit,
            per_gram = %korean_price_gram,
            "국내 금 시세"
        );

        let rate = ExchangeRateResolver::new(self.source.as_ref(), self.sample_limit)
            .resolve(&self.currency, today, self.max_attempts)
            .await?;

        let result = calculate_premium(international.value(), korean_price_gram, rate.rate)?;

        info!(
            premium = %result.premium_percentage,
            exchange_rate = %rate.rate,
            rate_date = %rate.as_of_date,
            "금 프리미엄 계산 완료"
        );
        Ok(result)
    }

    /// 옵션 체인 페이지에서 풋/콜 지표를 추출합니다.
    pub async fn put_call_ratio(&self) -> ServiceResult<PutCallRatios> {
        let raw = self.source.fetch(&SourceRequest::OptionsPage).await?;
        let text = flatten_html(&raw);
        let ratios = extract_put_call_ratios(&text, self.sample_limit)?;

        info!(
            volume_ratio = %ratios.volume_ratio,
            open_interest_ratio = %ratios.open_interest_ratio,
            "풋/콜 지표 추출 완료"
        );
        Ok(ratios)
    }
}
