//! # 문자열 유틸리티
//!
//! 문자열 처리와 관련된 공통 유틸리티 함수들입니다.

/// 공백만 있거나 비어 있는 문자열인지 확인합니다.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn clean_optional_string(value: Option<&str>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 토큰 등 민감한 값을 로그에 남길 수 있도록 마스킹합니다.
///
/// 앞 4자만 남기고 나머지는 `*`로 가리며, 8자 이하면 전부 가립니다.
///
/// ```rust
/// use publish_task_gateway::utils::string_utils::mask_secret;
///
/// assert_eq!(mask_secret("eyJhbGciOiJIUzI1NiJ9"), "eyJh****");
/// assert_eq!(mask_secret("short"), "****");
/// ```
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() <= 8 {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    format!("{}****", prefix)
}
