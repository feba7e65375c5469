//! 금 프리미엄(김치 프리미엄) 계산.
//!
//! 국제 금 시세(USD/oz)를 환율을 이용해 그램당 KRW로 환산하고,
//! 국내 금 시세가 환산가 대비 몇 % 높은지 계산합니다.
//!
//! ```text
//! converted = (international_price_oz / 31.1035) * exchange_rate
//! premium   = (korean_price_gram - converted) / converted * 100
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{CalculationError, PreconditionError, PremiumError};

/// 1 트로이온스 = 31.1035 그램
pub const OUNCE_TO_GRAM: Decimal = dec!(31.1035);

/// 1 돈 = 3.75 그램
pub const DON_TO_GRAM: Decimal = dec!(3.75);

/// 프리미엄 계산 결과.
///
/// 응답 JSON에서는 모든 값이 숫자(float)로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumResult {
    /// 국제 금 시세 (USD/oz)
    #[serde(with = "rust_decimal::serde::float")]
    pub international_price_oz: Decimal,
    /// 국내 금 시세 (KRW/g)
    #[serde(with = "rust_decimal::serde::float")]
    pub korean_price_gram: Decimal,
    /// USD/KRW 환율
    #[serde(with = "rust_decimal::serde::float")]
    pub exchange_rate: Decimal,
    /// 국제 시세 환산가 (KRW/g)
    #[serde(with = "rust_decimal::serde::float")]
    pub converted_price_krw_per_gram: Decimal,
    /// 프리미엄 (%)
    #[serde(with = "rust_decimal::serde::float")]
    pub premium_percentage: Decimal,
}

/// 국제 시세를 그램당 KRW로 환산합니다.
///
/// 국내 시세는 사용하지 않습니다. 결과가 Decimal 범위를 벗어나면 `None`.
pub fn converted_price_krw_per_gram(
    international_price_oz: Decimal,
    exchange_rate: Decimal,
) -> Option<Decimal> {
    international_price_oz
        .checked_div(OUNCE_TO_GRAM)?
        .checked_mul(exchange_rate)
}

/// 프리미엄을 계산합니다.
///
/// 세 입력값은 모두 0보다 커야 하며, 그렇지 않으면 나눗셈 전에
/// [`PreconditionError`]를 반환합니다. 중간값이 Decimal 범위를 벗어나면
/// [`CalculationError`]를 반환합니다.
pub fn calculate_premium(
    international_price_oz: Decimal,
    korean_price_gram: Decimal,
    exchange_rate: Decimal,
) -> Result<PremiumResult, PremiumError> {
    ensure_positive("international_price_oz", international_price_oz)?;
    ensure_positive("korean_price_gram", korean_price_gram)?;
    ensure_positive("exchange_rate", exchange_rate)?;

    let converted = converted_price_krw_per_gram(international_price_oz, exchange_rate).ok_or(
        CalculationError {
            field: "converted_price_krw_per_gram",
        },
    )?;
    // 극단적으로 작은 입력은 반올림으로 0이 될 수 있음
    ensure_positive("converted_price_krw_per_gram", converted)?;

    let premium_percentage = korean_price_gram
        .checked_sub(converted)
        .and_then(|diff| diff.checked_div(converted))
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or(CalculationError {
            field: "premium_percentage",
        })?;

    Ok(PremiumResult {
        international_price_oz,
        korean_price_gram,
        exchange_rate,
        converted_price_krw_per_gram: converted,
        premium_percentage,
    })
}

fn ensure_positive(field: &'static str, value: Decimal) -> Result<(), PreconditionError> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(PreconditionError { field, value })
    }
}
