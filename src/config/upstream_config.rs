//! 외부 백엔드(업스트림) 설정
//!
//! 기본값 → `GATEWAY_CONFIG_FILE` JSON 파일 → 환경 변수 순서로 덮어쓴 뒤
//! `validator`로 검증합니다.
//!
//! ## 설정 파일 예시
//!
//! ```json
//! {
//!   "baseUrl": "https://api.example.cn/api",
//!   "timeoutSecs": 15,
//!   "defaultHeaders": { "X-Client": "publish-task-h5" },
//!   "endpointPaths": { "bank.setdefault": "/v2/bank-cards/{cardId}/default" }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::data_config::{ConfigError, EnvSource};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 업스트림 백엔드 설정
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct UpstreamConfig {
    /// 모든 엔드포인트 경로가 이어 붙는 기준 주소
    #[validate(url, custom(function = "validate_http_scheme"))]
    pub base_url: String,

    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,

    /// 모든 업스트림 요청에 붙는 헤더
    pub default_headers: BTreeMap<String, String>,

    /// 엔드포인트 이름 → 업스트림 경로 오버라이드
    #[validate(custom(function = "validate_endpoint_paths"))]
    pub endpoint_paths: HashMap<String, String>,
}

/// 설정 파일 형식 (모든 키 선택)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct UpstreamConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    default_headers: Option<BTreeMap<String, String>>,
    endpoint_paths: Option<HashMap<String, String>>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        let default_headers = BTreeMap::from([
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]);

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_headers,
            endpoint_paths: HashMap::new(),
        }
    }
}

impl UpstreamConfig {
    /// 환경 변수 스냅샷에서 설정을 로드합니다.
    ///
    /// # Environment Variables
    ///
    /// - `GATEWAY_CONFIG_FILE`: JSON 설정 파일 경로 (선택)
    /// - `API_BASE_URL`: 기준 주소 오버라이드
    /// - `UPSTREAM_TIMEOUT_SECS`: 요청 타임아웃(초) 오버라이드
    ///
    /// # Errors
    ///
    /// 파일 읽기/파싱 실패, 잘못된 환경 변수 값, 검증 실패 시 `ConfigError`
    pub fn load(source: &EnvSource) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = source.get("GATEWAY_CONFIG_FILE") {
            let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
                path: path.to_string(),
                source: e,
            })?;
            config.merge_json(&raw)?;
            log::info!("업스트림 설정 파일 로드됨: {}", path);
        }

        if let Some(base_url) = source.get("API_BASE_URL") {
            config.base_url = base_url.to_string();
        }
        if let Some(timeout_secs) = source.parse::<u64>("UPSTREAM_TIMEOUT_SECS")? {
            config.timeout_secs = timeout_secs;
        }

        config.validate()?;
        Ok(config)
    }

    /// JSON 설정 문서의 값들을 현재 설정 위에 덮어씁니다.
    ///
    /// `default_headers`는 키 단위로 병합되고, `endpoint_paths`도 마찬가지입니다.
    pub fn merge_json(&mut self, raw: &str) -> Result<(), ConfigError> {
        let file: UpstreamConfigFile = serde_json::from_str(raw)?;

        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(headers) = file.default_headers {
            self.default_headers.extend(headers);
        }
        if let Some(paths) = file.endpoint_paths {
            self.endpoint_paths.extend(paths);
        }

        Ok(())
    }

    /// 기준 주소와 경로를 이어 붙입니다.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

fn validate_http_scheme(base_url: &str) -> Result<(), ValidationError> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("http_scheme"))
    }
}

fn validate_endpoint_paths(paths: &HashMap<String, String>) -> Result<(), ValidationError> {
    if paths.values().all(|path| path.starts_with('/')) {
        Ok(())
    } else {
        Err(ValidationError::new("endpoint_path_must_start_with_slash"))
    }
}
