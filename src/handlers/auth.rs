//! 세션 쿠키 핸들러
//!
//! 로그인 성공 시 발급되는 세션 쿠키와 로그아웃 처리를 담당합니다.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::config::SessionConfig;
use crate::domain::ClientEnvelope;
use crate::services::proxy::ProxyService;

pub const LOGOUT_MESSAGE: &str = "退出登录成功";

/// 세션 쿠키를 생성합니다.
///
/// `HttpOnly; Path=/; SameSite=Lax; Max-Age=<days>`, 운영 환경에서는 `Secure`가 추가됩니다.
pub fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(Duration::days(config.max_age_days))
        .finish()
}

/// 세션 쿠키를 즉시 만료시키는 쿠키
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = session_cookie(config, String::new());
    cookie.make_removal();
    cookie
}

/// 로그아웃: 세션 쿠키를 지우고 성공 envelope를 반환합니다.
///
/// 업스트림을 호출하지 않으며 세션이 없어도 성공합니다.
pub async fn logout(service: web::Data<ProxyService>) -> HttpResponse {
    log::info!("로그아웃: 세션 쿠키 삭제");
    HttpResponse::Ok()
        .cookie(removal_cookie(service.session_config()))
        .json(ClientEnvelope::success(200, LOGOUT_MESSAGE, Value::Null))
}
