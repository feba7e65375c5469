//! 설정 관리.
//!
//! 설정은 다음 순서로 병합됩니다 (뒤가 우선):
//! 1. 코드 기본값 (`#[serde(default)]`)
//! 2. 설정 파일 (`config/default.toml`, 없어도 됨)
//! 3. `PREMIUM__` 접두사 환경 변수 (예: `PREMIUM__SERVER__PORT=8080`)
//! 4. `EXCHANGE_RATE_API_KEY` 환경 변수 (환율 API 인증키)

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::domain::DomesticUnit;
use crate::error::ConfigError;

/// 기본 설정 파일 경로
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 환율 API 인증키 환경 변수
pub const EXCHANGE_RATE_API_KEY_ENV: &str = "EXCHANGE_RATE_API_KEY";

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub premium: PremiumConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 요청 전체에 대한 타임아웃 (초)
    ///
    /// 금 프리미엄 요청의 최악 소요 시간(시세 2회 + 환율 `max_attempts`회 조회)보다
    /// 길어야 합니다. [`AppConfig::worst_case_request_secs`] 참고.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 120,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// pretty, json, compact
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "premium_api=info,premium_data=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 외부 데이터 소스 설정.
#[derive(Debug, Deserialize)]
pub struct SourcesConfig {
    /// 국제 금 시세 URL
    #[serde(default = "default_international_url")]
    pub international_url: String,
    /// 국내 금 시세 URL
    #[serde(default = "default_domestic_url")]
    pub domestic_url: String,
    /// 날짜별 환율 URL (쿼리 문자열 제외)
    #[serde(default = "default_exchange_rate_url")]
    pub exchange_rate_url: String,
    /// 환율 API 인증키
    #[serde(deserialize_with = "deserialize_secret")]
    pub exchange_rate_api_key: SecretString,
    /// 환율 API 데이터 구분 코드 (AP01: 환율)
    #[serde(default = "default_exchange_rate_data_code")]
    pub exchange_rate_data_code: String,
    /// 옵션 체인 페이지 URL
    #[serde(default = "default_options_url")]
    pub options_url: String,
    /// 외부 요청 타임아웃 (초), 모든 소스에 동일하게 적용
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// 연결 타임아웃 (초)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl SourcesConfig {
    /// 기본 URL과 주어진 인증키로 생성합니다.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            international_url: default_international_url(),
            domestic_url: default_domestic_url(),
            exchange_rate_url: default_exchange_rate_url(),
            exchange_rate_api_key: SecretString::new(api_key.into().into()),
            exchange_rate_data_code: default_exchange_rate_data_code(),
            options_url: default_options_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_international_url() -> String {
    "https://www.samsunggold.co.kr/realtime/ajax/getMarketData.php?onlyInter=1".to_string()
}
fn default_domestic_url() -> String {
    "https://m.stock.naver.com/front-api/marketIndex/prices?category=metals&reutersCode=M04020000&page=1"
        .to_string()
}
fn default_exchange_rate_url() -> String {
    "https://oapi.koreaexim.go.kr/site/program/financial/exchangeJSON".to_string()
}
fn default_exchange_rate_data_code() -> String {
    "AP01".to_string()
}
fn default_options_url() -> String {
    "https://www.barchart.com/etfs-funds/quotes/GLD/options".to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_connect_timeout_secs() -> u64 {
    5
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| SecretString::new(s.into()))
}

/// 환율 조회 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// 조회 대상 통화 코드
    pub currency: String,
    /// 최대 조회 일수 (오늘부터 하루씩 과거로)
    pub max_attempts: u32,
    /// "오늘"을 판단하는 시간대 (IANA 이름)
    pub timezone: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            max_attempts: 7,
            timezone: "Asia/Seoul".to_string(),
        }
    }
}

/// 프리미엄 계산 설정.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PremiumConfig {
    /// 국내 시세 단위 (gram | don)
    pub domestic_unit: DomesticUnit,
}

/// 에러 진단 정보 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// 에러 응답에 포함할 원본 응답 샘플 최대 글자 수
    pub sample_limit: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { sample_limit: 500 }
    }
}

impl AppConfig {
    /// 기본값과 주어진 소스 설정으로 생성합니다.
    pub fn new(sources: SourcesConfig) -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            sources,
            resolver: ResolverConfig::default(),
            premium: PremiumConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }

    /// 파일과 환경 변수에서 설정을 로드하고 검증합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("PREMIUM")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(api_key) = std::env::var(EXCHANGE_RATE_API_KEY_ENV) {
            builder = builder.set_override("sources.exchange_rate_api_key", api_key)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 설정값 검증.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.exchange_rate_api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "환율 API 인증키가 비어 있습니다 ({} 또는 sources.exchange_rate_api_key)",
                EXCHANGE_RATE_API_KEY_ENV
            )));
        }
        if self.resolver.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "resolver.max_attempts는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.resolver.currency.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "resolver.currency가 비어 있습니다".to_string(),
            ));
        }
        if self.sources.request_timeout_secs == 0 || self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "타임아웃은 1초 이상이어야 합니다".to_string(),
            ));
        }
        let worst_case = self.worst_case_request_secs();
        if self.server.request_timeout_secs < worst_case {
            return Err(ConfigError::Invalid(format!(
                "server.request_timeout_secs({})가 외부 조회 최악 소요 시간({}초)보다 짧습니다",
                self.server.request_timeout_secs, worst_case
            )));
        }
        if self.diagnostics.sample_limit == 0 {
            return Err(ConfigError::Invalid(
                "diagnostics.sample_limit는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 금 프리미엄 요청 하나의 최악 소요 시간 (초).
    ///
    /// 국제/국내 시세 2회와 환율 `max_attempts`회가 모두 타임아웃되는 경우입니다.
    pub fn worst_case_request_secs(&self) -> u64 {
        (2 + u64::from(self.resolver.max_attempts))
            .saturating_mul(self.sources.request_timeout_secs)
    }

    /// 서버 바인딩 주소 문자열 (`host:port`).
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
