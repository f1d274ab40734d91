//! 게이트웨이 전역에서 사용하는 에러 시스템
//!
//! 모든 프록시 핸들러는 단일 경계에서 `AppError`로 실패를 수렴시킵니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 클라이언트 envelope
//! (`{success, code, message, data, timestamp}`) 형태의 에러 응답을 일관되게 생성합니다.
//!
//! ## 상태 코드 매핑
//!
//! | 변형 | HTTP | 응답 본문 |
//! |------|------|-----------|
//! | `AuthenticationError` | 401 | 에러 envelope |
//! | `ValidationError` | 400 | 에러 envelope |
//! | `MethodNotAllowed` | 405 | 에러 envelope |
//! | `NotFound` | 404 | 에러 envelope |
//! | `UpstreamError` | 업스트림 상태 그대로 | 업스트림 본문 그대로 |
//! | `ServerError` | 500 | 일반화된 메시지의 에러 envelope |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! fn require_card_id(body: &serde_json::Value) -> Result<&str, AppError> {
//!     body.get("cardId")
//!         .and_then(|v| v.as_str())
//!         .ok_or_else(|| AppError::ValidationError("缺少银行卡ID".to_string()))
//! }
//! ```

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::dto::envelope::ClientEnvelope;

/// 인증 토큰이 없을 때 클라이언트에 노출되는 메시지
pub const UNAUTHORIZED_MESSAGE: &str = "未登录或登录已过期，请重新登录";

/// 내부 오류 시 클라이언트에 노출되는 일반화된 메시지
pub const SERVER_ERROR_MESSAGE: &str = "服务器错误，请稍后重试";

/// 지원하지 않는 메서드 호출 시 메시지
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "不支持的请求方法";

/// 라우트가 존재하지 않을 때 메시지
pub const NOT_FOUND_MESSAGE: &str = "接口不存在";

/// 게이트웨이 전역 에러 타입
///
/// 검증/인증 에러는 업스트림 호출 전에 로컬에서 생성되며,
/// 나머지 실패는 핸들러의 바깥 경계에서 이 타입으로 변환됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 세션 토큰 누락 또는 무효 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 필수 필드 누락 또는 형식 오류 (400 Bad Request)
    ///
    /// 메시지는 필드별로 정의된 문구가 그대로 클라이언트에 전달됩니다.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 라우트가 지원하지 않는 HTTP 메서드 (405 Method Not Allowed)
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 존재하지 않는 라우트 (404 Not Found)
    #[error("Not found")]
    NotFound,

    /// 백엔드가 2xx 이외의 상태를 반환한 경우
    ///
    /// 상태 코드와 본문을 가공하지 않고 그대로 전달합니다.
    #[error("Upstream responded with status {status}")]
    UpstreamError {
        status: u16,
        content_type: Option<String>,
        body: Vec<u8>,
    },

    /// 네트워크 실패, JSON 파싱 실패, 예상하지 못한 예외 (500 Internal Server Error)
    ///
    /// 내부 상세 정보는 로그에만 남고 클라이언트에는 일반화된 메시지만 노출됩니다.
    #[error("Server error: {0}")]
    ServerError(String),
}

impl AppError {
    /// 클라이언트에게 노출할 메시지를 반환합니다.
    pub fn client_message(&self) -> String {
        match self {
            AppError::AuthenticationError(msg) | AppError::ValidationError(msg) => msg.clone(),
            AppError::MethodNotAllowed => METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            AppError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            AppError::UpstreamError { status, .. } => format!("上游服务返回错误状态: {}", status),
            AppError::ServerError(_) => SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::UpstreamError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// `UpstreamError`는 업스트림 본문을 그대로 중계하고,
    /// 나머지는 `success: false` 에러 envelope로 직렬화합니다.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if let AppError::UpstreamError { content_type, body, .. } = self {
            let mut builder = HttpResponse::build(status);
            if let Some(content_type) = content_type {
                builder.insert_header((CONTENT_TYPE, content_type.as_str()));
            }
            return builder.body(body.clone());
        }

        if let AppError::ServerError(detail) = self {
            log::error!("요청 처리 중 서버 오류: {}", detail);
        }

        HttpResponse::build(status).json(ClientEnvelope::failure(
            i64::from(status.as_u16()),
            self.client_message(),
        ))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 `ServerError`로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::ServerError(format!("{}: {}", msg, e)))
    }
}
