//! # Configuration Module
//!
//! 게이트웨이의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수와 선택적 JSON 설정 파일을 기반으로 설정값들을 중앙에서 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버 바인딩, CORS, Rate Limiting, 공용 `EnvSource`/`ConfigError`
//! - [`upstream_config`] - 외부 백엔드 기준 주소, 타임아웃, 기본 헤더, 엔드포인트 경로 오버라이드
//! - [`auth_config`] - 세션 쿠키 이름과 수명
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="3000"
//!
//! # 업스트림
//! export API_BASE_URL="https://api.example.cn/api"
//! export UPSTREAM_TIMEOUT_SECS="30"
//! export GATEWAY_CONFIG_FILE="./gateway.json"   # 선택
//!
//! # 세션
//! export SESSION_COOKIE_NAME="PublishTask_token"
//! export NODE_ENV="production"                   # Secure 쿠키
//! ```
//!
//! ## 로딩 방식
//!
//! 서버/CORS 설정은 정적 접근자(`ServerConfig::port()`)로 읽고,
//! 업스트림/세션 설정은 시작 시 한 번 `EnvSource` 스냅샷에서 로드하여
//! `ProxyService`에 주입합니다.

pub mod data_config;
pub mod upstream_config;
pub mod auth_config;

pub use data_config::*;
pub use upstream_config::*;
pub use auth_config::*;
