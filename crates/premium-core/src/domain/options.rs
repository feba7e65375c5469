//! 옵션 체인 풋/콜 지표.

use serde::{Deserialize, Serialize};

/// 옵션 페이지에서 추출한 풋/콜 지표.
///
/// 모든 값은 페이지에 표시된 문자열 그대로 보관합니다 (예: "4,500").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutCallRatios {
    /// Put/Call 거래량 비율
    pub volume_ratio: String,
    /// Put/Call 미결제약정 비율
    pub open_interest_ratio: String,
    /// 풋 거래량
    pub put_volume: String,
    /// 콜 거래량
    pub call_volume: String,
}
