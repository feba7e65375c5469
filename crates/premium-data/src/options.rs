//! 옵션 체인 페이지의 풋/콜 지표 추출.
//!
//! 평문으로 변환한 페이지에서 네 개의 라벨 뒤 숫자를 찾습니다.
//! 네 개 모두 찾은 경우에만 성공합니다.

use once_cell::sync::Lazy;
use premium_core::{bounded_prefix, ExtractionError, PutCallRatios};
use regex::Regex;

/// 비율: 소수점 허용
const RATIO: &str = r"(\d+(?:\.\d+)?)";
/// 거래량: 천 단위 구분자 허용
const VOLUME: &str = r"(\d{1,3}(?:,\d{3})+|\d+)";

static VOLUME_RATIO: Lazy<Regex> = Lazy::new(|| labelled(r"Put/Call Vol(?:ume)? Ratio", RATIO));
static OPEN_INTEREST_RATIO: Lazy<Regex> =
    Lazy::new(|| labelled(r"Put/Call Open Int(?:erest)? Ratio", RATIO));
static PUT_VOLUME: Lazy<Regex> = Lazy::new(|| labelled(r"(?:^|[^/\w])Put Volume", VOLUME));
static CALL_VOLUME: Lazy<Regex> = Lazy::new(|| labelled(r"(?:^|[^/\w])Call Volume", VOLUME));

fn labelled(label: &str, value: &str) -> Regex {
    Regex::new(&format!(r"(?i){}\s*:?\s*{}", label, value))
        .expect("Failed to compile options label regex")
}

fn capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// 평문 텍스트에서 풋/콜 지표를 추출합니다.
///
/// 값은 페이지에 표시된 문자열 그대로 반환합니다.
pub fn extract_put_call_ratios(
    text: &str,
    sample_limit: usize,
) -> Result<PutCallRatios, ExtractionError> {
    let volume_ratio = capture(&VOLUME_RATIO, text);
    let open_interest_ratio = capture(&OPEN_INTEREST_RATIO, text);
    let put_volume = capture(&PUT_VOLUME, text);
    let call_volume = capture(&CALL_VOLUME, text);

    match (volume_ratio, open_interest_ratio, put_volume, call_volume) {
        (Some(volume_ratio), Some(open_interest_ratio), Some(put_volume), Some(call_volume)) => {
            Ok(PutCallRatios {
                volume_ratio,
                open_interest_ratio,
                put_volume,
                call_volume,
            })
        }
        (a, b, c, d) => {
            let found_count = [a.is_some(), b.is_some(), c.is_some(), d.is_some()]
                .iter()
                .filter(|found| **found)
                .count();
            Err(ExtractionError::Incomplete {
                found_count,
                sample: bounded_prefix(text, sample_limit),
            })
        }
    }
}
