//! 퍼블리시 태스크 게이트웨이
//!
//! 모바일 마켓플레이스 클라이언트와 외부 백엔드 사이에 위치하는 인증 프록시입니다.
//! 세션 쿠키(`PublishTask_token`)에서 베어러 토큰을 꺼내 필수 필드를 검증한 뒤,
//! 요청을 백엔드로 전달하고 응답을 그대로 또는 클라이언트 envelope로 중계합니다.
//!
//! # Features
//!
//! - **단일 제네릭 어댑터**: 모든 라우트가 `EndpointSpec` 파라미터 하나로 기술됨
//! - **로컬 검증**: 인증/필수 필드 실패는 업스트림 호출 전에 401/400으로 응답
//! - **응답 매핑 테이블**: `{success, code, message, data, timestamp}` 재구성을 선언적으로 지정
//! - **세션 쿠키**: 로그인 시 발급, 로그아웃 시 삭제
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← 엔드포인트 테이블 + 405/404
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 추출, 쿠키 설정
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  ProxyService   │ ← 인증, 검증, 요청 구성, 응답 중계
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ UpstreamClient  │ ← reqwest 어댑터
//! └─────────────────┘
//! ```

pub mod config;
pub mod domain;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
