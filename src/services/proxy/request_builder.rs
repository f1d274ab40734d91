//! 업스트림 요청 구성
//!
//! 기준 주소 + 엔드포인트 경로(자리표시자 치환) + 남은 쿼리스트링으로 URL을 만들고,
//! 기본 헤더, 베어러 토큰, 요청 ID를 붙입니다.

use serde_json::{Map, Value};

use crate::config::UpstreamConfig;
use crate::domain::{BodyShape, FieldSource, ResolvedEndpoint, SessionToken};
use crate::errors::{AppError, AppResult, ErrorContext};

use super::upstream_client::OutboundRequest;
use super::validation::{InboundPayload, INVALID_PAYLOAD_MESSAGE};

/// 요청 추적용 헤더
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// 수신 요청으로부터 업스트림 요청을 구성합니다.
///
/// 필수 필드 검증이 끝난 페이로드를 전제로 합니다.
pub fn build_request(
    config: &UpstreamConfig,
    endpoint: &ResolvedEndpoint,
    payload: &InboundPayload,
    token: Option<&SessionToken>,
    request_id: &str,
) -> AppResult<OutboundRequest> {
    let (path, consumed) = render_path(endpoint, payload)?;
    let mut url = config.url_for(&path);

    let query = forwarded_query(&payload.query, &consumed);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    let mut headers: Vec<(String, String)> = config
        .default_headers
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    if let Some(token) = token {
        headers.push(("Authorization".to_string(), token.bearer_header()));
    }
    headers.push((REQUEST_ID_HEADER.to_string(), request_id.to_string()));

    Ok(OutboundRequest {
        method: endpoint.spec.method,
        url,
        headers,
        body: shape_body(endpoint, payload)?,
    })
}

/// `{param}` 자리표시자를 퍼센트 인코딩된 필드 값으로 치환합니다.
///
/// 쿼리에서 읽은 파라미터 이름은 함께 반환되어 전달 쿼리에서 제외됩니다.
fn render_path<'e>(
    endpoint: &'e ResolvedEndpoint,
    payload: &InboundPayload,
) -> AppResult<(String, Vec<&'e str>)> {
    let source = endpoint.spec.field_source();
    let mut path = endpoint.upstream_path.clone();
    let mut consumed = Vec::new();

    for param in endpoint.path_params() {
        let message = endpoint
            .spec
            .required_field(param)
            .map(|field| field.message.to_string())
            .unwrap_or_else(|| format!("缺少参数: {}", param));

        let segment = payload
            .field(source, param)?
            .and_then(|value| value.as_segment())
            .ok_or(AppError::ValidationError(message))?;

        path = path.replace(
            &format!("{{{}}}", param),
            &urlencoding::encode(&segment),
        );
        if source == FieldSource::Query {
            consumed.push(param);
        }
    }

    Ok((path, consumed))
}

fn forwarded_query(query: &[(String, String)], consumed: &[&str]) -> String {
    query
        .iter()
        .filter(|(key, _)| !consumed.contains(&key.as_str()))
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn shape_body(endpoint: &ResolvedEndpoint, payload: &InboundPayload) -> AppResult<Option<Vec<u8>>> {
    if endpoint.spec.field_source() == FieldSource::Query {
        return Ok(None);
    }

    match endpoint.spec.body {
        BodyShape::Verbatim => Ok(payload.body.as_ref().map(|_| payload.raw_body.clone())),
        BodyShape::Pick(fields) => {
            let source = match &payload.body {
                None => None,
                Some(Value::Object(object)) => Some(object),
                Some(_) => {
                    return Err(AppError::ValidationError(INVALID_PAYLOAD_MESSAGE.to_string()));
                }
            };

            let picked: Map<String, Value> = fields
                .iter()
                .filter_map(|name| {
                    source
                        .and_then(|object| object.get(*name))
                        .map(|value| (name.to_string(), value.clone()))
                })
                .collect();

            serde_json::to_vec(&Value::Object(picked))
                .map(Some)
                .context("업스트림 본문 직렬화 실패")
        }
    }
}
