//! 업스트림 프록시
//!
//! - [`validation`] - 수신 페이로드 파싱과 필수 필드 검증
//! - [`request_builder`] - 업스트림 URL/헤더/본문 구성
//! - [`upstream_client`] - 백엔드 호출 포트와 reqwest 어댑터
//! - [`relay`] - 응답 중계와 envelope 변환
//! - [`proxy_service`] - 위 단계를 묶는 `ProxyService`

pub mod proxy_service;
pub mod relay;
pub mod request_builder;
pub mod upstream_client;
pub mod validation;

#[cfg(test)]
pub mod test_support;

pub use proxy_service::{InboundRequest, ProxyService};
pub use relay::RelayedResponse;
pub use upstream_client::{ReqwestUpstreamClient, UpstreamClient};
