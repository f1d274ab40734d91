//! 세션 쿠키 설정
//!
//! 베어러 토큰은 단일 HttpOnly 쿠키로 운반됩니다. 로그인 시 설정되고,
//! 이후 모든 인증 요청에서 읽힙니다.

use validator::{Validate, ValidationError};

use super::data_config::{ConfigError, EnvSource, Environment};

/// 기본 세션 쿠키 이름
pub const DEFAULT_SESSION_COOKIE: &str = "PublishTask_token";

pub const DEFAULT_SESSION_MAX_AGE_DAYS: i64 = 7;

/// 세션 쿠키 설정
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SessionConfig {
    #[validate(length(min = 1, max = 64), custom(function = "validate_cookie_name"))]
    pub cookie_name: String,

    #[validate(range(min = 1, max = 365))]
    pub max_age_days: i64,

    /// 프로덕션에서는 `Secure` 플래그를 붙입니다.
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            max_age_days: DEFAULT_SESSION_MAX_AGE_DAYS,
            secure: false,
        }
    }
}

impl SessionConfig {
    /// 환경 변수 스냅샷에서 세션 설정을 로드합니다.
    ///
    /// # Environment Variables
    ///
    /// - `SESSION_COOKIE_NAME`: 쿠키 이름 (기본값: `PublishTask_token`)
    /// - `SESSION_MAX_AGE_DAYS`: 쿠키 수명 (기본값: 7일)
    /// - `NODE_ENV`: `production`이면 `Secure` 쿠키
    pub fn load(source: &EnvSource) -> Result<Self, ConfigError> {
        let config = Self {
            cookie_name: source
                .get("SESSION_COOKIE_NAME")
                .unwrap_or(DEFAULT_SESSION_COOKIE)
                .to_string(),
            max_age_days: source
                .parse::<i64>("SESSION_MAX_AGE_DAYS")?
                .unwrap_or(DEFAULT_SESSION_MAX_AGE_DAYS),
            secure: Environment::from_source(source).is_production(),
        };

        config.validate()?;
        Ok(config)
    }
}

fn validate_cookie_name(name: &str) -> Result<(), ValidationError> {
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("cookie_name"))
    }
}
