//! 날짜별 환율 조회.
//!
//! 시작일부터 하루씩 과거로 이동하며 환율 목록을 조회하고, 대상 통화의
//! 매매기준율(`deal_bas_r`)을 처음 찾은 날짜의 값을 사용합니다.
//! 주말/공휴일을 따로 판단하지 않고 단순히 하루씩 되돌아갑니다.

use chrono::{Days, NaiveDate};
use premium_core::{ExchangeRate, ParseError, ResolveError, SourceKind};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::parser::parse_decimal;
use crate::provider::{RawSource, SourceRequest};

/// 환율 API 응답의 레코드 하나.
#[derive(Debug, Clone, Deserialize)]
pub struct RateRecord {
    /// 조회 결과 코드 (1: 성공, 2: DATA 코드 오류, 3: 인증코드 오류, 4: 일일 제한 횟수 마감)
    #[serde(default)]
    pub result: Option<i64>,
    /// 통화 코드 (예: "USD", "JPY(100)")
    #[serde(default)]
    pub cur_unit: Option<String>,
    /// 통화명
    #[serde(default)]
    pub cur_nm: Option<String>,
    /// 매매기준율 (예: "1,300.5")
    #[serde(default)]
    pub deal_bas_r: Option<String>,
}

/// 결과 코드 설명.
fn describe_result_code(code: i64) -> &'static str {
    match code {
        1 => "성공",
        2 => "DATA 코드 오류",
        3 => "인증코드 오류",
        4 => "일일 제한 횟수 마감",
        _ => "알 수 없는 코드",
    }
}

/// 환율 API 응답 본문을 레코드 목록으로 변환합니다.
pub fn parse_rate_records(raw: &str, sample_limit: usize) -> Result<Vec<RateRecord>, ParseError> {
    serde_json::from_str::<Vec<RateRecord>>(raw).map_err(|e| {
        ParseError::new(
            SourceKind::ExchangeRate,
            format!("환율 목록 형식이 아닙니다: {}", e),
            raw,
            sample_limit,
        )
    })
}

/// 레코드 목록에서 통화 코드가 일치하는 첫 레코드의 환율을 찾습니다.
///
/// 일치하는 레코드가 없으면 `Ok(None)`, 일치하지만 환율이 숫자가 아니면 에러입니다.
pub fn find_rate(
    records: &[RateRecord],
    currency: &str,
    date: NaiveDate,
    sample_limit: usize,
) -> Result<Option<ExchangeRate>, ParseError> {
    let Some(record) = records
        .iter()
        .find(|r| r.cur_unit.as_deref() == Some(currency))
    else {
        return Ok(None);
    };

    let raw_rate = record.deal_bas_r.as_deref().unwrap_or_default();
    let rate = parse_decimal(raw_rate).ok_or_else(|| {
        ParseError::new(
            SourceKind::ExchangeRate,
            format!("{} 매매기준율 '{}'을(를) 숫자로 변환할 수 없습니다", currency, raw_rate),
            raw_rate,
            sample_limit,
        )
    })?;

    Ok(Some(ExchangeRate {
        currency_code: currency.to_string(),
        rate,
        as_of_date: date,
    }))
}

/// 하루씩 과거로 이동하며 환율을 찾는 조회기.
pub struct ExchangeRateResolver<'a> {
    source: &'a dyn RawSource,
    sample_limit: usize,
}

impl<'a> ExchangeRateResolver<'a> {
    pub fn new(source: &'a dyn RawSource, sample_limit: usize) -> Self {
        Self {
            source,
            sample_limit,
        }
    }

    /// `start_date`부터 최대 `max_attempts`일 동안 `currency` 환율을 찾습니다.
    ///
    /// 조회/파싱 실패나 빈 목록은 경고 로그를 남기고 전날로 넘어갑니다.
    pub async fn resolve(
        &self,
        currency: &str,
        start_date: NaiveDate,
        max_attempts: u32,
    ) -> Result<ExchangeRate, ResolveError> {
        let mut attempts = 0;
        let mut last_reason: Option<String> = None;

        for offset in 0..max_attempts {
            let Some(date) = start_date.checked_sub_days(Days::new(u64::from(offset))) else {
                break;
            };
            attempts += 1;

            match self.attempt(currency, date).await {
                Ok(Some(rate)) => {
                    info!(
                        currency,
                        date = %date,
                        rate = %rate.rate,
                        attempts,
                        "환율 조회 완료"
                    );
                    return Ok(rate);
                }
                Ok(None) => {
                    last_reason = Some(format!("{} 레코드 없음 ({})", currency, date));
                }
                Err(reason) => {
                    warn!(currency, date = %date, attempt = attempts, "{}", reason);
                    last_reason = Some(reason);
                }
            }
        }

        Err(ResolveError::AttemptsExhausted {
            currency: currency.to_string(),
            attempts,
            last_reason,
        })
    }

    /// 하루치 조회. 환율을 찾지 못한 경우 `Ok(None)` 또는 사유 문자열.
    async fn attempt(&self, currency: &str, date: NaiveDate) -> Result<Option<ExchangeRate>, String> {
        let raw = self
            .source
            .fetch(&SourceRequest::ExchangeRates { date })
            .await
            .map_err(|e| e.to_string())?;

        let records = parse_rate_records(&raw, self.sample_limit).map_err(|e| e.to_string())?;

        if records.is_empty() {
            return Err("환율 목록이 비어 있습니다 (휴일 또는 영업 전)".to_string());
        }

        if let Some(code) = records.iter().find_map(|r| r.result).filter(|code| *code != 1) {
            return Err(format!(
                "환율 API 결과 코드 {} ({})",
                code,
                describe_result_code(code)
            ));
        }

        let rate = find_rate(&records, currency, date, self.sample_limit).map_err(|e| e.to_string())?;
        if rate.is_none() {
            debug!(currency, date = %date, count = records.len(), "대상 통화 레코드 없음");
        }
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use premium_core::FetchError;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 날짜별 응답을 돌려주고 요청 날짜를 기록하는 스텁.
    struct StubRates {
        responses: HashMap<NaiveDate, String>,
        requested: Mutex<Vec<NaiveDate>>,
    }

    impl StubRates {
        fn new(responses: HashMap<NaiveDate, String>) -> Self {
            Self {
                responses,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.requested.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RawSource for StubRates {
        async fn fetch(&self, request: &SourceRequest) -> Result<String, FetchError> {
            let SourceRequest::ExchangeRates { date } = request else {
                panic!("unexpected request: {:?}", request);
            };
            self.requested.lock().unwrap().push(*date);
            self.responses.get(date).cloned().ok_or(FetchError::Status {
                source_kind: SourceKind::ExchangeRate,
                status: 500,
            })
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    const USD_LIST: &str = r#"[
        {"result":1,"cur_unit":"JPY(100)","cur_nm":"일본 옌","deal_bas_r":"912.34"},
        {"result":1,"cur_unit":"USD","cur_nm":"미국 달러","deal_bas_r":"1,300.5"}
    ]"#;

    #[tokio::test]
    async fn test_match_on_fifth_day_back() {
        let mut responses = HashMap::new();
        responses.insert(day(10), "[]".to_string());
        responses.insert(day(9), "not json".to_string());
        responses.insert(day(8), r#"[{"result":1,"cur_unit":"EUR","deal_bas_r":"1,420.1"}]"#.to_string());
        responses.insert(day(6), USD_LIST.to_string());
        let stub = StubRates::new(responses);

        let resolver = ExchangeRateResolver::new(&stub, 500);
        let rate = resolver.resolve("USD", day(10), 7).await.unwrap();

        assert_eq!(rate.rate, dec!(1300.5));
        assert_eq!(rate.as_of_date, day(6));
        assert_eq!(rate.currency_code, "USD");
        assert_eq!(stub.fetch_count(), 5);
        assert_eq!(
            *stub.requested.lock().unwrap(),
            vec![day(10), day(9), day(8), day(7), day(6)]
        );
    }

    #[tokio::test]
    async fn test_exhausted_after_max_attempts() {
        let stub = StubRates::new(HashMap::new());
        let resolver = ExchangeRateResolver::new(&stub, 500);

        let err = resolver.resolve("USD", day(20), 7).await.unwrap_err();

        let ResolveError::AttemptsExhausted {
            currency,
            attempts,
            last_reason,
        } = err;
        assert_eq!(currency, "USD");
        assert_eq!(attempts, 7);
        assert!(last_reason.unwrap().contains("500"));
        assert_eq!(stub.fetch_count(), 7);
    }

    #[tokio::test]
    async fn test_match_on_first_day_stops_scan() {
        let mut responses = HashMap::new();
        responses.insert(day(15), USD_LIST.to_string());
        let stub = StubRates::new(responses);

        let resolver = ExchangeRateResolver::new(&stub, 500);
        let rate = resolver.resolve("USD", day(15), 7).await.unwrap();

        assert_eq!(rate.as_of_date, day(15));
        assert_eq!(stub.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_non_numeric_rate_continues_scan() {
        let mut responses = HashMap::new();
        responses.insert(day(15), r#"[{"result":1,"cur_unit":"USD","deal_bas_r":"-"}]"#.to_string());
        responses.insert(day(14), USD_LIST.to_string());
        let stub = StubRates::new(responses);

        let resolver = ExchangeRateResolver::new(&stub, 500);
        let rate = resolver.resolve("USD", day(15), 7).await.unwrap();

        assert_eq!(rate.as_of_date, day(14));
        assert_eq!(stub.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_error_result_code_continues_scan() {
        let auth_failure = r#"[{"result":3,"cur_unit":null,"deal_bas_r":null}]"#;
        let mut responses = HashMap::new();
        responses.insert(day(15), auth_failure.to_string());
        responses.insert(day(14), auth_failure.to_string());
        let stub = StubRates::new(responses);

        let resolver = ExchangeRateResolver::new(&stub, 500);
        let err = resolver.resolve("USD", day(15), 2).await.unwrap_err();

        assert_eq!(stub.fetch_count(), 2);
        let ResolveError::AttemptsExhausted {
            attempts,
            last_reason,
            ..
        } = err;
        assert_eq!(attempts, 2);
        assert!(last_reason.unwrap().contains("인증코드 오류"));
    }

    #[test]
    fn test_find_rate_no_match() {
        let records = parse_rate_records(USD_LIST, 500).unwrap();
        assert!(find_rate(&records, "CNH", day(1), 500).unwrap().is_none());
    }

    #[test]
    fn test_parse_rate_records_rejects_object() {
        let err = parse_rate_records(r#"{"error":"x"}"#, 500).unwrap_err();
        assert_eq!(err.source_kind, SourceKind::ExchangeRate);
    }

    #[test]
    fn test_describe_result_code() {
        assert_eq!(describe_result_code(4), "일일 제한 횟수 마감");
        assert_eq!(describe_result_code(99), "알 수 없는 코드");
    }
}
