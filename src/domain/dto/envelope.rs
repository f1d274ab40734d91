use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 클라이언트가 기대하는 응답 래퍼
///
/// 일부 엔드포인트는 백엔드 응답을 이 형태로 재구성하며,
/// 게이트웨이가 직접 생성하는 에러 응답도 같은 형태를 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientEnvelope {
    pub success: bool,
    pub code: i64,
    pub message: String,
    pub data: Value,
    /// Unix epoch 밀리초
    pub timestamp: i64,
}

impl ClientEnvelope {
    pub fn new(success: bool, code: i64, message: impl Into<String>, data: Value) -> Self {
        Self {
            success,
            code,
            message: message.into(),
            data,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn success(code: i64, message: impl Into<String>, data: Value) -> Self {
        Self::new(true, code, message, data)
    }

    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self::new(false, code, message, Value::Null)
    }
}
