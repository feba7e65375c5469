//! 시세 응답 파서.
//!
//! 소스마다 "이름 있는 추출 전략"의 순서 있는 목록을 두고, 앞에서부터
//! 시도하여 처음 값을 얻은 전략의 결과를 사용합니다.
//!
//! - 국제 시세: `gold_ask` → `gold_bid` (`"0.00"`은 유효한 호가가 아님)
//! - 국내 시세: `closePrice` → `tradePrice`
//!
//! 처음 발견된 필드의 숫자 변환이 실패하면 다음 전략으로 넘어가지 않고
//! 즉시 [`ParseError`]를 반환합니다.

use std::str::FromStr;

use once_cell::sync::Lazy;
use premium_core::{ParseError, PriceUnit, Quote, SourceKind};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::html::flatten_html;

/// 앵커 뒤의 첫 숫자 토큰 (천 단위 구분자, 소수점, 음수 허용)
static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-?\d[\d,]*(?:\.\d+)?").expect("Failed to compile numeric token regex")
});

/// 국제 시세에서 "호가 없음"을 의미하는 값
const NO_QUOTE_SENTINELS: &[&str] = &["0.00"];

/// 단일 값 추출 전략.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// JSON 포인터로 필드를 조회합니다. 문자열/숫자 모두 허용하며,
    /// `sentinels`에 포함된 문자열은 값이 없는 것으로 봅니다.
    JsonField {
        name: &'static str,
        pointer: &'static str,
        sentinels: &'static [&'static str],
    },
    /// 평문으로 변환한 응답에서 `anchor` 다음의 첫 숫자를 사용합니다.
    TextAnchor {
        name: &'static str,
        anchor: &'static str,
    },
}

impl ExtractionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionStrategy::JsonField { name, .. } => name,
            ExtractionStrategy::TextAnchor { name, .. } => name,
        }
    }

    fn extract_json(&self, document: &Value) -> Option<String> {
        let ExtractionStrategy::JsonField {
            pointer, sentinels, ..
        } = self
        else {
            return None;
        };

        let token = match document.pointer(pointer)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        if token.is_empty() || sentinels.iter().any(|s| *s == token) {
            return None;
        }
        Some(token)
    }

    fn extract_text(&self, text: &str) -> Option<String> {
        let ExtractionStrategy::TextAnchor { anchor, .. } = self else {
            return None;
        };

        let start = text.find(anchor)? + anchor.len();
        NUMERIC_TOKEN
            .find(&text[start..])
            .map(|m| m.as_str().to_string())
    }
}

/// 소스별 시세 파서.
#[derive(Debug, Clone)]
pub struct QuoteParser {
    source: SourceKind,
    unit: PriceUnit,
    strategies: Vec<ExtractionStrategy>,
    sample_limit: usize,
}

impl QuoteParser {
    pub fn new(
        source: SourceKind,
        unit: PriceUnit,
        strategies: Vec<ExtractionStrategy>,
        sample_limit: usize,
    ) -> Self {
        Self {
            source,
            unit,
            strategies,
            sample_limit,
        }
    }

    /// 국제 금 시세 파서 (USD/oz).
    ///
    /// `data.interMarketPriceApiDTO` 아래의 필드를 우선 사용하고,
    /// 최상위에 같은 이름의 필드가 있으면 그 다음으로 사용합니다.
    pub fn international(sample_limit: usize) -> Self {
        Self::new(
            SourceKind::International,
            PriceUnit::UsdPerOunce,
            vec![
                ExtractionStrategy::JsonField {
                    name: "gold_ask",
                    pointer: "/data/interMarketPriceApiDTO/gold_ask",
                    sentinels: NO_QUOTE_SENTINELS,
                },
                ExtractionStrategy::JsonField {
                    name: "gold_bid",
                    pointer: "/data/interMarketPriceApiDTO/gold_bid",
                    sentinels: NO_QUOTE_SENTINELS,
                },
                ExtractionStrategy::JsonField {
                    name: "gold_ask",
                    pointer: "/gold_ask",
                    sentinels: NO_QUOTE_SENTINELS,
                },
                ExtractionStrategy::JsonField {
                    name: "gold_bid",
                    pointer: "/gold_bid",
                    sentinels: NO_QUOTE_SENTINELS,
                },
            ],
            sample_limit,
        )
    }

    /// 국내 금 시세 파서 (KRW).
    pub fn domestic(sample_limit: usize) -> Self {
        Self::new(
            SourceKind::Domestic,
            PriceUnit::KrwPerGram,
            vec![
                ExtractionStrategy::JsonField {
                    name: "closePrice",
                    pointer: "/result/0/closePrice",
                    sentinels: &[],
                },
                ExtractionStrategy::JsonField {
                    name: "tradePrice",
                    pointer: "/result/0/tradePrice",
                    sentinels: &[],
                },
            ],
            sample_limit,
        )
    }

    /// 원본 응답에서 시세를 추출합니다.
    pub fn parse(&self, raw: &str) -> Result<Quote, ParseError> {
        let has_json = self
            .strategies
            .iter()
            .any(|s| matches!(s, ExtractionStrategy::JsonField { .. }));
        let has_text = self
            .strategies
            .iter()
            .any(|s| matches!(s, ExtractionStrategy::TextAnchor { .. }));

        let document = if has_json {
            match serde_json::from_str::<Value>(raw) {
                Ok(value) => Some(value),
                Err(e) if !has_text => {
                    return Err(self.error(format!("JSON 형식이 아닙니다: {}", e), raw));
                }
                Err(_) => None,
            }
        } else {
            None
        };

        let mut flattened: Option<String> = None;

        for strategy in &self.strategies {
            let token = match strategy {
                ExtractionStrategy::JsonField { .. } => document
                    .as_ref()
                    .and_then(|doc| strategy.extract_json(doc)),
                ExtractionStrategy::TextAnchor { .. } => {
                    let text = flattened.get_or_insert_with(|| flatten_html(raw));
                    strategy.extract_text(text)
                }
            };

            let Some(token) = token else {
                continue;
            };

            let value = parse_decimal(&token).ok_or_else(|| {
                self.error(
                    format!("{} 값 '{}'을(를) 숫자로 변환할 수 없습니다", strategy.name(), token),
                    raw,
                )
            })?;

            debug!(source = %self.source, field = strategy.name(), %value, "시세 파싱 완료");
            return Ok(Quote::new(value, self.unit, self.source));
        }

        let mut names: Vec<&str> = Vec::new();
        for strategy in &self.strategies {
            if !names.contains(&strategy.name()) {
                names.push(strategy.name());
            }
        }
        Err(self.error(
            format!("알려진 필드를 찾을 수 없습니다: {}", names.join(", ")),
            raw,
        ))
    }

    fn error(&self, reason: String, raw: &str) -> ParseError {
        ParseError::new(self.source, reason, raw, self.sample_limit)
    }
}

/// 천 단위 구분자와 공백을 제거하고 Decimal로 변환합니다.
///
/// "1,234.56" -> 1234.56
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}
