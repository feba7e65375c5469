//! 시세 및 환율 도메인 타입.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::premium::DON_TO_GRAM;

/// 외부 데이터 소스 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// 국제 금 시세 (USD/oz)
    International,
    /// 국내 금 시세 (KRW)
    Domestic,
    /// 날짜별 환율
    ExchangeRate,
    /// 옵션 체인 페이지
    OptionsPage,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::International => "international_gold",
            SourceKind::Domestic => "domestic_gold",
            SourceKind::ExchangeRate => "exchange_rate",
            SourceKind::OptionsPage => "options_page",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 가격 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceUnit {
    /// 트로이온스당 USD
    UsdPerOunce,
    /// 그램당 KRW
    KrwPerGram,
}

/// 파싱된 시세.
///
/// 파싱 이후에는 변경되지 않습니다. 값을 얻지 못한 경우 0이 아니라
/// 파싱 에러로 처리되므로, `Quote`가 존재하면 값도 존재합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    value: Decimal,
    unit: PriceUnit,
    source: SourceKind,
}

impl Quote {
    pub fn new(value: Decimal, unit: PriceUnit, source: SourceKind) -> Self {
        Self {
            value,
            unit,
            source,
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn unit(&self) -> PriceUnit {
        self.unit
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }
}

/// 환율 레코드.
///
/// `rate`는 `currency_code` 1단위당 KRW 입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    /// 통화 코드 (예: "USD")
    pub currency_code: String,
    /// 매매 기준율
    pub rate: Decimal,
    /// 기준 일자
    pub as_of_date: NaiveDate,
}

/// 국내 금 시세 응답의 가격 단위.
///
/// 국내 시세가 그램당 가격인지 돈(3.75g)당 가격인지는 원천 스키마로
/// 확인이 필요하므로 설정값으로 명시합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomesticUnit {
    /// 그램당 가격 (변환 없음)
    #[default]
    Gram,
    /// 돈(3.75g)당 가격
    Don,
}

impl DomesticUnit {
    /// 국내 시세를 그램당 가격으로 변환합니다.
    pub fn to_per_gram(&self, price: Decimal) -> Decimal {
        match self {
            DomesticUnit::Gram => price,
            DomesticUnit::Don => price / DON_TO_GRAM,
        }
    }
}

impl std::str::FromStr for DomesticUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gram" | "g" => Ok(Self::Gram),
            "don" => Ok(Self::Don),
            _ => Err(format!("Unknown domestic unit: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_domestic_unit_conversion() {
        assert_eq!(DomesticUnit::Gram.to_per_gram(dec!(90000)), dec!(90000));
        assert_eq!(DomesticUnit::Don.to_per_gram(dec!(375000)), dec!(100000));
    }

    #[test]
    fn test_domestic_unit_from_str() {
        assert_eq!("gram".parse::<DomesticUnit>().unwrap(), DomesticUnit::Gram);
        assert_eq!("DON".parse::<DomesticUnit>().unwrap(), DomesticUnit::Don);
        assert!("ounce".parse::<DomesticUnit>().is_err());
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::International.to_string(), "international_gold");
        assert_eq!(SourceKind::OptionsPage.to_string(), "options_page");
    }
}
