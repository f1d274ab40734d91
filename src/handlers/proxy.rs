//! 프록시 라우트 핸들러
//!
//! 모든 엔드포인트가 `forward` 하나를 공유하며,
//! 라우트 등록 시 해당 `ResolvedEndpoint`가 클로저로 바인딩됩니다.

use std::sync::Arc;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::domain::{ResolvedEndpoint, SessionToken};
use crate::errors::AppError;
use crate::handlers::auth::session_cookie;
use crate::services::proxy::request_builder::REQUEST_ID_HEADER;
use crate::services::proxy::{InboundRequest, ProxyService};
use crate::utils::string_utils::clean_optional_string;

/// 엔드포인트 하나를 업스트림으로 전달합니다.
pub async fn forward(
    endpoint: Arc<ResolvedEndpoint>,
    req: HttpRequest,
    body: web::Bytes,
    service: web::Data<ProxyService>,
) -> Result<HttpResponse, AppError> {
    let request_id = request_id(&req);
    let inbound = InboundRequest {
        query_string: req.query_string().to_string(),
        body: body.to_vec(),
        token: req.extensions().get::<SessionToken>().cloned(),
        request_id: request_id.clone(),
    };

    let relayed = service.dispatch(&endpoint, inbound).await?;

    let status = StatusCode::from_u16(relayed.status).map_err(|e| {
        AppError::ServerError(format!("잘못된 업스트림 상태 {}: {}", relayed.status, e))
    })?;

    let mut builder = HttpResponse::build(status);
    builder.insert_header((REQUEST_ID_HEADER, request_id));
    if let Some(content_type) = &relayed.content_type {
        builder.insert_header((CONTENT_TYPE, content_type.as_str()));
    }
    if let Some(token) = relayed.issued_token {
        log::info!("{} 세션 쿠키 발급", endpoint.name());
        builder.cookie(session_cookie(service.session_config(), token));
    }

    Ok(builder.body(relayed.body))
}

/// 등록된 라우트에 다른 메서드로 들어온 요청
pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, AppError> {
    log::warn!("허용되지 않은 메서드: {} {}", req.method(), req.path());
    Err(AppError::MethodNotAllowed)
}

/// 등록되지 않은 경로
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    log::debug!("존재하지 않는 경로: {} {}", req.method(), req.path());
    Err(AppError::NotFound)
}

/// 수신 `X-Request-Id`를 이어받거나 새로 발급합니다.
fn request_id(req: &HttpRequest) -> String {
    clean_optional_string(
        req.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    )
    .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_request_id_is_propagated() {
        let req = TestRequest::default()
            .insert_header((REQUEST_ID_HEADER, "trace-42"))
            .to_http_request();
        assert_eq!(request_id(&req), "trace-42");
    }

    #[test]
    fn test_request_id_is_generated() {
        let req = TestRequest::default().to_http_request();
        let generated = request_id(&req);
        assert!(Uuid::parse_str(&generated).is_ok());
    }
}
