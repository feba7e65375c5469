//! reqwest 기반 HTTP 소스.
//!
//! 모든 소스는 하나의 `Client`를 공유하며, 요청 타임아웃과 연결 타임아웃은
//! 설정값 하나로 동일하게 적용됩니다.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use premium_core::{FetchError, SourceKind, SourcesConfig};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use super::{RawSource, SourceRequest};

/// HTTP로 각 데이터 소스를 조회합니다.
pub struct HttpSource {
    client: Client,
    international_url: String,
    domestic_url: String,
    exchange_rate_url: String,
    exchange_rate_api_key: SecretString,
    exchange_rate_data_code: String,
    options_url: String,
    timeout_secs: u64,
}

impl HttpSource {
    /// 소스 설정으로 HTTP 클라이언트를 생성합니다.
    pub fn new(config: &SourcesConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            international_url: config.international_url.clone(),
            domestic_url: config.domestic_url.clone(),
            exchange_rate_url: config.exchange_rate_url.clone(),
            exchange_rate_api_key: SecretString::new(
                config.exchange_rate_api_key.expose_secret().into(),
            ),
            exchange_rate_data_code: config.exchange_rate_data_code.clone(),
            options_url: config.options_url.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn build_request(&self, request: &SourceRequest) -> RequestBuilder {
        match request {
            SourceRequest::InternationalGold => self.client.get(&self.international_url),
            SourceRequest::DomesticGold => self.client.get(&self.domestic_url),
            SourceRequest::ExchangeRates { date } => {
                let searchdate = date.format("%Y%m%d").to_string();
                self.client.get(&self.exchange_rate_url).query(&[
                    ("authkey", self.exchange_rate_api_key.expose_secret()),
                    ("searchdate", searchdate.as_str()),
                    ("data", self.exchange_rate_data_code.as_str()),
                ])
            }
            SourceRequest::OptionsPage => self.client.get(&self.options_url),
        }
    }

    /// 로그용 URL (인증키 제외).
    fn display_url(&self, request: &SourceRequest) -> String {
        match request {
            SourceRequest::InternationalGold => self.international_url.clone(),
            SourceRequest::DomesticGold => self.domestic_url.clone(),
            SourceRequest::ExchangeRates { date } => format!(
                "{}?searchdate={}&data={}",
                self.exchange_rate_url,
                date.format("%Y%m%d"),
                self.exchange_rate_data_code
            ),
            SourceRequest::OptionsPage => self.options_url.clone(),
        }
    }

    fn map_error(&self, kind: SourceKind, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                source_kind: kind,
                timeout_secs: self.timeout_secs,
            }
        } else {
            FetchError::Network {
                source_kind: kind,
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl RawSource for HttpSource {
    async fn fetch(&self, request: &SourceRequest) -> Result<String, FetchError> {
        let kind = request.kind();
        let url = self.display_url(request);
        let started = Instant::now();

        debug!(source = %kind, url = %url, "외부 소스 요청");

        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(|e| self.map_error(kind, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(source = %kind, status = status.as_u16(), "비정상 응답 상태");
            return Err(FetchError::Status {
                source_kind: kind,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.map_error(kind, e))?;

        debug!(
            source = %kind,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "외부 소스 응답 수신"
        );

        Ok(body)
    }
}
