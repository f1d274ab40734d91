//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client (Mobile App)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈) - 요청 추출, 응답/쿠키 구성    ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   ProxyService - 인증, 검증, 전달, 중계           ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   UpstreamClient - 외부 백엔드 호출              ← Outbound Port
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 구성
//!
//! - [`proxy`] - 모든 프록시 라우트가 공유하는 `forward`, 405/404 응답
//! - [`auth`] - 세션 쿠키 생성과 로그아웃
//!
//! 핸들러는 `Result<HttpResponse, AppError>`를 반환하며,
//! 에러 응답 형식은 `AppError`의 `ResponseError` 구현이 결정합니다.

pub mod auth;
pub mod proxy;
