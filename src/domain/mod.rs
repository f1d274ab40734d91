//! 도메인 계층
//!
//! 엔드포인트 파라미터 객체와 클라이언트 envelope를 정의합니다.
//! 사용자, 지갑, 임대 주문 등의 엔티티는 외부 백엔드가 소유하며
//! 이 저장소에서는 불투명한 JSON으로만 다룹니다.

pub mod dto;
pub mod endpoint;
pub mod session;

pub use dto::*;
pub use endpoint::*;
pub use session::SessionToken;
