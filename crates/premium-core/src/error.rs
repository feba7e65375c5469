//! 금 프리미엄 서비스의 에러 타입.
//!
//! 요청 처리 중 발생할 수 있는 모든 실패를 닫힌 열거형으로 정의합니다.
//! 분류되지 않은 에러는 존재하지 않으며, 모든 단계의 실패는
//! [`PremiumError`]로 모여 호출자에게 그대로 전달됩니다.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::SourceKind;

/// 외부 데이터 소스 요청 실패 (네트워크/타임아웃/비정상 상태 코드).
#[derive(Debug, Error)]
pub enum FetchError {
    /// 연결 실패, 본문 수신 실패 등 네트워크 에러
    #[error("{source_kind} 요청 실패: {message}")]
    Network { source_kind: SourceKind, message: String },

    /// 요청 시간 초과
    #[error("{source_kind} 요청 시간 초과 ({timeout_secs}초)")]
    Timeout { source_kind: SourceKind, timeout_secs: u64 },

    /// 2xx 이외의 HTTP 상태 코드
    #[error("{source_kind} 비정상 응답 상태: {status}")]
    Status { source_kind: SourceKind, status: u16 },
}

impl FetchError {
    /// 실패한 데이터 소스.
    pub fn kind(&self) -> SourceKind {
        match self {
            FetchError::Network { source_kind, .. }
            | FetchError::Timeout { source_kind, .. }
            | FetchError::Status { source_kind, .. } => *source_kind,
        }
    }
}

/// 응답 본문 파싱 실패.
///
/// `raw_sample`은 원본 응답의 앞부분(길이 제한)으로, 진단용입니다.
#[derive(Debug, Clone, Error)]
#[error("{source_kind} 응답 파싱 실패: {reason}")]
pub struct ParseError {
    pub source_kind: SourceKind,
    pub reason: String,
    pub raw_sample: String,
}

impl ParseError {
    /// 원본 응답 앞부분을 `sample_limit` 글자로 잘라 에러를 생성합니다.
    pub fn new(
        source_kind: SourceKind,
        reason: impl Into<String>,
        raw: &str,
        sample_limit: usize,
    ) -> Self {
        Self {
            source_kind,
            reason: reason.into(),
            raw_sample: bounded_prefix(raw, sample_limit),
        }
    }
}

/// 환율 조회 실패.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// 허용된 시도 횟수 안에 해당 통화 레코드를 찾지 못함
    ///
    /// `last_reason`은 마지막 시도의 실패 사유입니다 (예: 인증코드 오류).
    #[error("{currency} 환율을 {attempts}일 동안 찾지 못했습니다{}", reason_suffix(.last_reason))]
    AttemptsExhausted {
        currency: String,
        attempts: u32,
        last_reason: Option<String>,
    },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(" (마지막 사유: {})", r))
        .unwrap_or_default()
}

/// 옵션 페이지에서 필드 추출 실패.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    /// 네 개의 필드 중 일부만 발견됨
    #[error("옵션 지표 추출 불완전: {found_count}/4 필드 발견")]
    Incomplete { found_count: usize, sample: String },
}

/// 계산기 진입 전 입력값 검증 실패.
#[derive(Debug, Clone, Error)]
#[error("잘못된 입력값: {field} = {value} (0보다 커야 합니다)")]
pub struct PreconditionError {
    pub field: &'static str,
    pub value: Decimal,
}

/// 계산 중간값이 Decimal 표현 범위를 벗어남.
#[derive(Debug, Clone, Error)]
#[error("계산 범위 초과: {field} 값을 표현할 수 없습니다")]
pub struct CalculationError {
    pub field: &'static str,
}

/// 한 요청에서 발생할 수 있는 모든 에러.
#[derive(Debug, Error)]
pub enum PremiumError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),
}

impl PremiumError {
    /// API 응답에 사용되는 안정적인 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            PremiumError::Fetch(_) => "FETCH_ERROR",
            PremiumError::Parse(_) => "PARSE_ERROR",
            PremiumError::Resolve(_) => "RESOLVE_ERROR",
            PremiumError::Extraction(_) => "INCOMPLETE_EXTRACTION",
            PremiumError::Precondition(_) => "PRECONDITION_ERROR",
            PremiumError::Calculation(_) => "CALCULATION_ERROR",
        }
    }
}

/// 요청 처리를 위한 Result 타입.
pub type ServiceResult<T> = Result<T, PremiumError>;

/// 설정 로드/검증 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),

    #[error("잘못된 설정값: {0}")]
    Invalid(String),
}

/// 문자 경계를 지키며 앞에서부터 최대 `limit` 글자를 잘라냅니다.
pub fn bounded_prefix(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
