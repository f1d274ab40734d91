//! 미들웨어 모듈
//!
//! ActixWeb 애플리케이션의 요청 처리 파이프라인에서 사용되는 미들웨어들을 제공합니다.
//!
//! # 제공 미들웨어
//!
//! ### 세션 미들웨어 (AuthMiddleware)
//! - 설정된 세션 쿠키에서 토큰 추출
//! - `SessionToken`을 request extension에 저장
//! - 요청을 거부하지 않음 (인증 필요 여부는 엔드포인트별로 `ProxyService`가 판단)
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{App, HttpServer};
//! use crate::middlewares::AuthMiddleware;
//!
//! HttpServer::new(|| {
//!     App::new()
//!         .wrap(AuthMiddleware::from_cookie("PublishTask_token"))
//!         .configure(|cfg| configure_all_routes(cfg, &table))
//! })
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
