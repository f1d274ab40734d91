//! 테스트용 업스트림 fixture

use std::sync::Mutex;

use async_trait::async_trait;

use super::upstream_client::{OutboundRequest, UpstreamClient, UpstreamFailure, UpstreamResponse};

/// 보낸 요청을 기록하고 미리 정한 응답을 돌려주는 업스트림
pub struct RecordingUpstream {
    reply: Result<UpstreamResponse, String>,
    calls: Mutex<Vec<OutboundRequest>>,
}

impl RecordingUpstream {
    pub fn replying(reply: UpstreamResponse) -> Self {
        Self {
            reply: Ok(reply),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn json(status: u16, body: &str) -> Self {
        Self::replying(UpstreamResponse::json(status, body.as_bytes().to_vec()))
    }

    /// 모든 호출이 연결 실패로 끝나는 업스트림
    pub fn unreachable() -> Self {
        Self {
            reply: Err("connection refused".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<OutboundRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> OutboundRequest {
        self.calls().pop().expect("upstream was not called")
    }
}

#[async_trait]
impl UpstreamClient for RecordingUpstream {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamFailure> {
        self.calls.lock().unwrap().push(request);
        self.reply.clone().map_err(UpstreamFailure::Transport)
    }
}
