//! 서버 및 실행 환경 설정 관리 모듈
//!
//! 실행 환경, 서버 바인딩, CORS, Rate Limiting 설정과
//! 설정 로더들이 공유하는 환경 변수 스냅샷 및 에러 타입을 제공합니다.

use std::collections::HashMap;
use std::env;

use thiserror::Error;

/// 설정 로딩 실패
///
/// 시작 시점에만 발생하며, 발생하면 프로세스는 기동을 중단합니다.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 설정 파일 읽기 실패
    #[error("설정 파일을 읽을 수 없습니다 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 설정 파일 JSON 파싱 실패
    #[error("설정 파일 파싱 실패: {0}")]
    Parse(#[from] serde_json::Error),

    /// 환경 변수 값 형식 오류
    #[error("환경 변수 {key} 값이 올바르지 않습니다: {value}")]
    InvalidValue { key: String, value: String },

    /// 검증 규칙 위반
    #[error("설정 검증 실패: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// 엔드포인트 경로 오버라이드 오류
    #[error("엔드포인트 설정 오류 ({endpoint}): {reason}")]
    Endpoint { endpoint: String, reason: String },
}

/// 환경 변수 스냅샷
///
/// 설정 로더는 프로세스 환경을 직접 읽지 않고 이 스냅샷을 받습니다.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    /// 현재 프로세스 환경 변수로 스냅샷을 생성합니다.
    pub fn from_process() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 값이 존재하고 공백이 아닐 때만 반환합니다.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// 값을 파싱합니다. 값이 없으면 `Ok(None)`입니다.
    pub fn parse<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 개발 환경
    Development,
    /// 테스트 환경
    Test,
    /// 스테이징 환경
    Staging,
    /// 프로덕션 환경 - 세션 쿠키에 `Secure` 플래그가 붙습니다
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `NODE_ENV`를 먼저 확인하고, 없으면 `ENVIRONMENT`를 확인합니다.
    /// 둘 다 없으면 `Production`을 기본값으로 사용합니다.
    pub fn from_source(source: &EnvSource) -> Self {
        source
            .get("NODE_ENV")
            .or_else(|| source.get("ENVIRONMENT"))
            .map(Self::from_str)
            .unwrap_or(Environment::Production)
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    /// 서버가 바인딩할 포트를 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `PORT`: 커스텀 포트 설정 (기본값: 3000)
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000)
    }

    /// 서버가 바인딩할 호스트 주소를 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `HOST`: 커스텀 호스트 설정 (기본값: "0.0.0.0")
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    /// CORS 허용 Origin 목록을 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `CORS_ALLOWED_ORIGINS`: 쉼표로 구분된 Origin 목록
    pub fn cors_origins() -> Vec<String> {
        Self::cors_origins_from(&EnvSource::from_process())
    }

    pub fn cors_origins_from(source: &EnvSource) -> Vec<String> {
        source
            .get("CORS_ALLOWED_ORIGINS")
            .unwrap_or("http://localhost:3000,http://127.0.0.1:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Rate Limiting 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// 환경변수에서 Rate Limiting 설정을 로드합니다.
    ///
    /// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
    /// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
    ///
    /// 파싱에 실패한 값은 에러 로그를 남기고 기본값을 사용합니다.
    pub fn load(source: &EnvSource) -> Self {
        let per_second = source.parse::<u64>("RATE_LIMIT_PER_SECOND").unwrap_or_else(|e| {
            log::error!("{}. 기본값 100 사용", e);
            None
        });
        let burst_size = source.parse::<u32>("RATE_LIMIT_BURST_SIZE").unwrap_or_else(|e| {
            log::error!("{}. 기본값 200 사용", e);
            None
        });

        Self {
            per_second: per_second.unwrap_or(100),
            burst_size: burst_size.unwrap_or(200),
        }
    }
}
