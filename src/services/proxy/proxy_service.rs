//! # 제네릭 인증 프록시 서비스
//!
//! 모든 프록시 라우트가 공유하는 단일 어댑터입니다.
//! 엔드포인트별 차이는 `EndpointSpec` 파라미터로만 표현됩니다.
//!
//! ## 처리 순서
//!
//! ```text
//! 인증 확인 → 페이로드 파싱 → 필수 필드 검증 → 요청 구성 → 업스트림 전송 → 응답 중계
//!     │              │               │                                  │
//!     ▼              ▼               ▼                                  ▼
//!    401            400             400                         500 / 업스트림 상태
//! ```
//!
//! 인증과 검증 단계에서 실패하면 업스트림 호출은 일어나지 않습니다.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{SessionConfig, UpstreamConfig};
use crate::domain::{ResolvedEndpoint, SessionToken};
use crate::errors::{AppError, AppResult, UNAUTHORIZED_MESSAGE};
use crate::utils::string_utils::mask_secret;

use super::relay::{relay, RelayedResponse};
use super::request_builder::build_request;
use super::upstream_client::UpstreamClient;
use super::validation::{check_required, InboundPayload};

/// 핸들러가 수신 요청에서 추출한 값들
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub query_string: String,
    pub body: Vec<u8>,
    pub token: Option<SessionToken>,
    /// 수신 `X-Request-Id` 값 또는 새로 발급한 UUID
    pub request_id: String,
}

pub struct ProxyService {
    upstream: UpstreamConfig,
    session: SessionConfig,
    client: Arc<dyn UpstreamClient>,
}

impl ProxyService {
    pub fn new(
        upstream: UpstreamConfig,
        session: SessionConfig,
        client: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            upstream,
            session,
            client,
        }
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }

    /// 하나의 프록시 요청을 처리합니다.
    ///
    /// # Errors
    ///
    /// - `AuthenticationError`: 인증이 필요한데 세션 토큰이 없음
    /// - `ValidationError`: 본문 형식 오류 또는 필수 필드 누락
    /// - `ServerError`: 업스트림 연결 실패, 타임아웃, JSON이 아닌 성공 응답
    /// - `UpstreamError`: 업스트림이 2xx가 아닌 상태를 반환
    pub async fn dispatch(
        &self,
        endpoint: &ResolvedEndpoint,
        inbound: InboundRequest,
    ) -> AppResult<RelayedResponse> {
        let name = endpoint.name();

        if endpoint.spec.requires_auth && inbound.token.is_none() {
            log::warn!("[{}] {} 세션 토큰 없음", inbound.request_id, name);
            return Err(AppError::AuthenticationError(UNAUTHORIZED_MESSAGE.to_string()));
        }

        let payload = InboundPayload::parse(&inbound.query_string, inbound.body)
            .and_then(|payload| check_required(endpoint.spec, &payload).map(|_| payload))
            .inspect_err(|e| {
                log::warn!("[{}] {} 요청 거부: {}", inbound.request_id, name, e);
            })?;

        let request = build_request(
            &self.upstream,
            endpoint,
            &payload,
            inbound.token.as_ref(),
            &inbound.request_id,
        )?;

        log::debug!(
            "[{}] {} → {} {} (token: {})",
            inbound.request_id,
            name,
            request.method.as_str(),
            request.url,
            inbound
                .token
                .as_ref()
                .map(|token| mask_secret(token.as_str()))
                .unwrap_or_else(|| "-".to_string())
        );

        let started = Instant::now();
        let response = self.client.send(request).await.inspect_err(|e| {
            log::error!(
                "[{}] {} 업스트림 호출 실패 ({}ms): {}",
                inbound.request_id,
                name,
                started.elapsed().as_millis(),
                e
            );
        })?;

        log::info!(
            "[{}] {} 업스트림 응답 {} ({}ms)",
            inbound.request_id,
            name,
            response.status,
            started.elapsed().as_millis()
        );

        relay(endpoint.spec, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BodyShape, EndpointSpec, EnvelopeStyle, ProxyMethod, RequiredField, ResponseMapping};
    use crate::services::proxy::test_support::RecordingUpstream;
    use crate::services::proxy::upstream_client::UpstreamResponse;

    const PASSWORD_FIELDS: &[RequiredField] = &[
        RequiredField::present("oldPassword", "请输入原密码"),
        RequiredField::present("newPassword", "请输入新密码"),
    ];
    const REGISTER_FIELDS: &[RequiredField] = &[RequiredField::present("username", "请输入用户名")];

    static CHANGE_PASSWORD: EndpointSpec = EndpointSpec::new(
        "users.changepwd",
        ProxyMethod::Post,
        "/api/users/changepwd",
        "/users/changepwd",
    )
    .with_required(PASSWORD_FIELDS)
    .with_body(BodyShape::Pick(&["oldPassword", "newPassword"]));

    static REGISTER: EndpointSpec = EndpointSpec::new(
        "auth.register",
        ProxyMethod::Post,
        "/api/auth/register",
        "/auth/register",
    )
    .public()
    .with_required(REGISTER_FIELDS)
    .with_envelope(EnvelopeStyle::Client(ResponseMapping::SUCCESS_200));

    fn service(upstream: Arc<RecordingUpstream>) -> ProxyService {
        let config = UpstreamConfig {
            base_url: "http://backend.test/api".to_string(),
            ..UpstreamConfig::default()
        };
        ProxyService::new(config, SessionConfig::default(), upstream)
    }

    fn inbound(body: &str, token: Option<&str>) -> InboundRequest {
        InboundRequest {
            query_string: String::new(),
            body: body.as_bytes().to_vec(),
            token: token.and_then(SessionToken::new),
            request_id: "req-test".to_string(),
        }
    }

    #[actix_web::test]
    async fn test_missing_token_short_circuits() {
        let upstream = Arc::new(RecordingUpstream::json(200, "{}"));
        let endpoint = ResolvedEndpoint::new(&CHANGE_PASSWORD, CHANGE_PASSWORD.upstream_path);

        let result = service(upstream.clone())
            .dispatch(&endpoint, inbound(r#"{"oldPassword":"a","newPassword":"b"}"#, None))
            .await;

        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
        assert!(upstream.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_validation_failure_short_circuits() {
        let upstream = Arc::new(RecordingUpstream::json(200, "{}"));
        let endpoint = ResolvedEndpoint::new(&CHANGE_PASSWORD, CHANGE_PASSWORD.upstream_path);

        let result = service(upstream.clone())
            .dispatch(&endpoint, inbound(r#"{"oldPassword":"a"}"#, Some("tok")))
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(msg)) if msg == "请输入新密码"));
        assert!(upstream.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_forwards_with_bearer_token() {
        let upstream = Arc::new(RecordingUpstream::json(200, r#"{"success":true}"#));
        let endpoint = ResolvedEndpoint::new(&CHANGE_PASSWORD, CHANGE_PASSWORD.upstream_path);

        let relayed = service(upstream.clone())
            .dispatch(
                &endpoint,
                inbound(r#"{"oldPassword":"a","newPassword":"b"}"#, Some("tok-1")),
            )
            .await
            .unwrap();

        assert_eq!(relayed.body, br#"{"success":true}"#.to_vec());
        let call = upstream.last_call();
        assert_eq!(call.method, ProxyMethod::Post);
        assert_eq!(call.url, "http://backend.test/api/users/changepwd");
        assert_eq!(call.header("Authorization"), Some("Bearer tok-1"));
        assert_eq!(call.header("X-Request-Id"), Some("req-test"));
    }

    #[actix_web::test]
    async fn test_public_endpoint_without_token() {
        let upstream = Arc::new(RecordingUpstream::json(200, r#"{"code":200,"data":{"id":9}}"#));
        let endpoint = ResolvedEndpoint::new(&REGISTER, REGISTER.upstream_path);

        let relayed = service(upstream.clone())
            .dispatch(&endpoint, inbound(r#"{"username":"alice"}"#, None))
            .await
            .unwrap();

        let body: serde_json::Value = serde_json::from_slice(&relayed.body).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 9);
        assert_eq!(upstream.last_call().header("Authorization"), None);
    }

    #[actix_web::test]
    async fn test_transport_failure_is_server_error() {
        let upstream = Arc::new(RecordingUpstream::unreachable());
        let endpoint = ResolvedEndpoint::new(&REGISTER, REGISTER.upstream_path);

        let result = service(upstream.clone())
            .dispatch(&endpoint, inbound(r#"{"username":"alice"}"#, None))
            .await;

        assert!(matches!(result, Err(AppError::ServerError(_))));
        assert_eq!(upstream.calls().len(), 1);
    }

    #[actix_web::test]
    async fn test_upstream_error_status_is_relayed() {
        let upstream = Arc::new(RecordingUpstream::replying(UpstreamResponse::json(
            409,
            r#"{"message":"用户名已存在"}"#.as_bytes().to_vec(),
        )));
        let endpoint = ResolvedEndpoint::new(&REGISTER, REGISTER.upstream_path);

        let result = service(upstream)
            .dispatch(&endpoint, inbound(r#"{"username":"alice"}"#, None))
            .await;

        assert!(matches!(result, Err(AppError::UpstreamError { status: 409, .. })));
    }
}
