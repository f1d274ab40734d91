//! 클라이언트와 주고받는 wire 형태
//!
//! 게이트웨이는 백엔드 DTO를 해석하지 않고 중계하므로,
//! 여기에는 게이트웨이가 직접 생성하는 envelope만 정의합니다.

pub mod envelope;

pub use envelope::ClientEnvelope;
