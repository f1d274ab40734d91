//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 모든 클라이언트 라우트는 [`proxy::ProxyService`] 하나를 공유하며,
//! 서비스는 `web::Data`로 주입됩니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use publish_task_gateway::services::proxy::{ProxyService, ReqwestUpstreamClient};
//!
//! let client = ReqwestUpstreamClient::from_config(&upstream_config)?;
//! let service = ProxyService::new(upstream_config, session_config, Arc::new(client));
//! ```

pub mod proxy;
