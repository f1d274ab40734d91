//! API 라우트 설정 모듈
//!
//! 프록시 엔드포인트 테이블([`endpoints::ENDPOINTS`])을 actix 리소스로 등록하고,
//! 로컬에서 처리하는 헬스체크/로그아웃 라우트를 함께 구성합니다.
//!
//! # Route Groups
//!
//! - `GET /health` - 헬스체크
//! - `POST /api/auth/logout` - 세션 쿠키 삭제 (업스트림 호출 없음)
//! - `/api/...` - 엔드포인트 테이블의 프록시 라우트
//!
//! 각 라우트는 정확히 하나의 메서드만 허용하며, 다른 메서드는 405,
//! 등록되지 않은 경로는 404 에러 envelope를 반환합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let table = resolve_endpoints(&upstream_config)?;
//! let app = App::new().configure(|cfg| configure_all_routes(cfg, &table));
//! ```

pub mod endpoints;


use std::sync::Arc;

use actix_web::{web, HttpRequest};
use serde_json::json;

use crate::domain::ResolvedEndpoint;
use crate::handlers;
use crate::services::proxy::ProxyService;

pub use endpoints::{find_endpoint, resolve_endpoints, ENDPOINTS};

/// 로그아웃 라우트
pub const LOGOUT_ROUTE: &str = "/api/auth/logout";

/// 모든 라우트를 설정합니다
///
/// # Arguments
///
/// * `cfg` - Actix-web 서비스 설정 객체
/// * `table` - 설정 오버라이드가 반영된 엔드포인트 목록
pub fn configure_all_routes(cfg: &mut web::ServiceConfig, table: &[Arc<ResolvedEndpoint>]) {
    // Health check endpoint
    cfg.service(health_check);

    cfg.service(
        web::resource(LOGOUT_ROUTE)
            .route(web::post().to(handlers::auth::logout))
            .default_service(web::route().to(handlers::proxy::method_not_allowed)),
    );

    for endpoint in table {
        configure_proxy_route(cfg, endpoint.clone());
    }

    cfg.default_service(web::route().to(handlers::proxy::not_found));
}

/// 엔드포인트 하나를 리소스로 등록합니다.
///
/// 선언된 메서드만 `forward`로 연결하고 나머지는 405로 응답합니다.
fn configure_proxy_route(cfg: &mut web::ServiceConfig, endpoint: Arc<ResolvedEndpoint>) {
    let spec = endpoint.spec;
    log::debug!(
        "라우트 등록: {} {} → {}",
        spec.method.as_str(),
        spec.route,
        endpoint.upstream_path
    );

    cfg.service(
        web::resource(spec.route)
            .route(web::method(spec.method.to_actix()).to(
                move |req: HttpRequest, body: web::Bytes, service: web::Data<ProxyService>| {
                    handlers::proxy::forward(endpoint.clone(), req, body, service)
                },
            ))
            .default_service(web::route().to(handlers::proxy::method_not_allowed)),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// # Examples
///
/// ```bash
/// curl http://localhost:3000/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "publish_task_gateway",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T00:00:00Z"
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
