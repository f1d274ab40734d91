//! 세션 토큰 추출 미들웨어
//!
//! 쿠키에 담긴 세션 토큰을 `SessionToken`으로 꺼내 request extension에 저장합니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::middlewares::auth_inner::AuthMiddlewareService;

/// 세션 쿠키 미들웨어
pub struct AuthMiddleware {
    /// 토큰을 읽을 쿠키 이름
    cookie_name: Rc<str>,
}

impl AuthMiddleware {
    pub fn from_cookie(cookie_name: &str) -> Self {
        Self {
            cookie_name: Rc::from(cookie_name),
        }
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            cookie_name: self.cookie_name.clone(),
        }))
    }
}
