//! 업스트림 백엔드 호출 포트
//!
//! `ProxyService`는 `UpstreamClient` trait에만 의존하며,
//! 운영 환경에서는 reqwest 기반 어댑터가 주입됩니다.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::domain::ProxyMethod;
use crate::errors::AppError;

/// 백엔드로 나가는 요청
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: ProxyMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    /// 헤더 값을 대소문자 구분 없이 조회합니다.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// 백엔드 응답 (가공 전)
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 백엔드 호출 실패
#[derive(Error, Debug)]
pub enum UpstreamFailure {
    #[error("업스트림 요청 시간 초과: {0}")]
    Timeout(String),

    #[error("업스트림 연결 실패: {0}")]
    Transport(String),

    #[error("업스트림 응답 본문 읽기 실패: {0}")]
    Body(String),
}

impl From<UpstreamFailure> for AppError {
    fn from(failure: UpstreamFailure) -> Self {
        AppError::ServerError(failure.to_string())
    }
}

/// 백엔드 호출 포트
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// 요청을 한 번 전송합니다. 재시도하지 않습니다.
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamFailure>;
}

/// reqwest 기반 업스트림 어댑터
pub struct ReqwestUpstreamClient {
    client: Client,
}

impl ReqwestUpstreamClient {
    /// 요청 타임아웃이 지정된 클라이언트를 생성합니다.
    ///
    /// # Errors
    ///
    /// reqwest 클라이언트를 구성할 수 없을 때 (TLS 백엔드 초기화 실패 등)
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Self::new(Duration::from_secs(config.timeout_secs))
    }
}

fn map_transport_error(error: reqwest::Error) -> UpstreamFailure {
    if error.is_timeout() {
        UpstreamFailure::Timeout(error.to_string())
    } else {
        UpstreamFailure::Transport(error.to_string())
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstreamClient {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamFailure> {
        let mut builder = self.client.request(request.method.to_reqwest(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamFailure::Body(e.to_string()))?
            .to_vec();

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
