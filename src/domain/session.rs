use std::fmt;

use crate::utils::string_utils::mask_secret;

/// 세션 쿠키에서 추출한 베어러 토큰
///
/// `Debug` 출력은 마스킹되어 로그에 원문이 남지 않습니다.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// 공백 토큰은 토큰이 없는 것으로 취급합니다.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&mask_secret(&self.0)).finish()
    }
}
