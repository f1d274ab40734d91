//! AuthMiddleware 토큰 추출 로직
use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;

use crate::domain::SessionToken;
use crate::utils::string_utils::mask_secret;

/// 실제 추출 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub cookie_name: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        match extract_session_token(&req, &self.cookie_name) {
            Some(token) => {
                log::debug!("세션 토큰 확인: {}", mask_secret(token.as_str()));
                req.extensions_mut().insert(token);
            }
            None => log::debug!("세션 토큰 없음: {}", req.path()),
        }

        Box::pin(async move { service.call(req).await })
    }
}

/// 요청 쿠키에서 세션 토큰을 추출
fn extract_session_token(req: &ServiceRequest, cookie_name: &str) -> Option<SessionToken> {
    req.cookie(cookie_name)
        .and_then(|cookie| SessionToken::new(cookie.value()))
}
