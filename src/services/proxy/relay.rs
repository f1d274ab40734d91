//! 업스트림 응답 중계
//!
//! 엔드포인트의 `EnvelopeStyle`에 따라 응답을 그대로 전달하거나
//! `ClientEnvelope`로 재구성합니다.

use serde_json::Value;

use crate::domain::{ClientEnvelope, EndpointSpec, EnvelopeStyle, ResponseMapping, SessionEffect};
use crate::errors::{AppError, AppResult};

use super::upstream_client::UpstreamResponse;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "操作成功";
pub const DEFAULT_FAILURE_MESSAGE: &str = "操作失败";

const JSON_CONTENT_TYPE: &str = "application/json";

/// 클라이언트로 돌려줄 응답
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// 세션 쿠키로 설정할 토큰
    pub issued_token: Option<String>,
}

/// 업스트림 응답을 엔드포인트 설정에 맞게 변환합니다.
///
/// # Errors
///
/// - 2xx가 아닌 상태: `UpstreamError` (상태, 본문 그대로)
/// - 2xx지만 JSON이 아닌 본문: `ServerError`
pub fn relay(spec: &EndpointSpec, response: UpstreamResponse) -> AppResult<RelayedResponse> {
    if !response.is_success() {
        return Err(AppError::UpstreamError {
            status: response.status,
            content_type: response.content_type,
            body: response.body,
        });
    }

    let parsed: Value = serde_json::from_slice(&response.body).map_err(|e| {
        AppError::ServerError(format!(
            "업스트림 응답이 JSON이 아닙니다 (status {}): {}",
            response.status, e
        ))
    })?;

    let (success, body, content_type) = match spec.envelope {
        EnvelopeStyle::PassThrough => {
            let success = match parsed.get("success") {
                Some(Value::Bool(flag)) => *flag,
                _ => true,
            };
            (success, response.body, response.content_type)
        }
        EnvelopeStyle::Client(mapping) => {
            let envelope = wrap(&mapping, response.status, &parsed);
            let body = serde_json::to_vec(&envelope)
                .map_err(|e| AppError::ServerError(format!("envelope 직렬화 실패: {}", e)))?;
            (envelope.success, body, Some(JSON_CONTENT_TYPE.to_string()))
        }
    };

    let issued_token = match spec.session {
        SessionEffect::IssueToken { token_pointers } if success => {
            find_token(&parsed, token_pointers)
        }
        _ => None,
    };

    Ok(RelayedResponse {
        status: response.status,
        content_type,
        body,
        issued_token,
    })
}

/// 업스트림 JSON을 매핑 테이블에 따라 `ClientEnvelope`로 옮깁니다.
///
/// `success`는 업스트림 코드가 성공 코드와 같을 때만 참입니다.
/// 코드가 없으면 명시적인 `success` 불리언을 따르고, 그것도 없으면 실패로 봅니다.
/// 코드 값 자체는 없을 때 HTTP 상태로 채웁니다.
/// 객체가 아닌 응답은 통째로 `data`가 됩니다.
pub fn wrap(mapping: &ResponseMapping, http_status: u16, upstream: &Value) -> ClientEnvelope {
    let Some(object) = upstream.as_object() else {
        return ClientEnvelope::new(
            false,
            i64::from(http_status),
            DEFAULT_FAILURE_MESSAGE,
            upstream.clone(),
        );
    };

    let upstream_code = mapping
        .code_keys
        .iter()
        .find_map(|key| object.get(*key).and_then(as_code));
    let success = match upstream_code {
        Some(code) => code == mapping.success_code,
        None => matches!(object.get("success"), Some(Value::Bool(true))),
    };
    let code = upstream_code.unwrap_or_else(|| i64::from(http_status));

    let message = mapping
        .message_keys
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| default_message(success).to_string());

    let data = mapping
        .data_keys
        .iter()
        .find_map(|key| object.get(*key))
        .cloned()
        .unwrap_or(Value::Null);

    ClientEnvelope::new(success, code, message, data)
}

fn default_message(success: bool) -> &'static str {
    if success {
        DEFAULT_SUCCESS_MESSAGE
    } else {
        DEFAULT_FAILURE_MESSAGE
    }
}

fn as_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|code| code.fract() == 0.0 && code.abs() < i64::MAX as f64)
                .map(|code| code as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn find_token(body: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .filter_map(|pointer| body.pointer(pointer))
        .find_map(Value::as_str)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProxyMethod;
    use rstest::rstest;
    use serde_json::json;

    const LOGIN_TOKEN_POINTERS: &[&str] = &["/data/token", "/data/accessToken", "/token"];

    static LOGIN: EndpointSpec = EndpointSpec::new(
        "auth.login",
        ProxyMethod::Post,
        "/api/auth/login",
        "/auth/login",
    )
    .public()
    .with_envelope(EnvelopeStyle::Client(ResponseMapping::SUCCESS_200))
    .issuing_token(LOGIN_TOKEN_POINTERS);

    static BALANCE: EndpointSpec = EndpointSpec::new(
        "wallet.balance",
        ProxyMethod::Get,
        "/api/walletmanagement/balance",
        "/wallet/balance",
    );

    static BANK_LIST: EndpointSpec = EndpointSpec::new(
        "bank.list",
        ProxyMethod::Get,
        "/api/bank/banklist",
        "/bank-cards",
    )
    .with_envelope(EnvelopeStyle::Client(ResponseMapping::SUCCESS_ZERO));

    fn envelope_of(relayed: &RelayedResponse) -> ClientEnvelope {
        serde_json::from_slice(&relayed.body).unwrap()
    }

    #[test]
    fn test_pass_through_keeps_bytes() {
        let raw = br#"{"success":true,"data":{"balance":"12.50","frozen":0}}"#.to_vec();
        let relayed = relay(&BALANCE, UpstreamResponse::json(200, raw.clone())).unwrap();

        assert_eq!(relayed.status, 200);
        assert_eq!(relayed.body, raw);
        assert_eq!(relayed.issued_token, None);
    }

    #[rstest]
    #[case::zero_code(json!({"code":0,"message":"ok","data":[{"id":1}]}), true, 0)]
    #[case::string_code(json!({"code":"0","data":[]}), true, 0)]
    #[case::business_failure(json!({"code":1001,"msg":"银行卡不存在"}), false, 1001)]
    #[case::status_key(json!({"status":0,"result":{}}), true, 0)]
    fn test_client_envelope_success_flag(
        #[case] upstream: Value,
        #[case] success: bool,
        #[case] code: i64,
    ) {
        let envelope = wrap(&ResponseMapping::SUCCESS_ZERO, 200, &upstream);
        assert_eq!(envelope.success, success);
        assert_eq!(envelope.code, code);
    }

    #[rstest]
    #[case::success_zero(ResponseMapping::SUCCESS_ZERO, json!({"data": 1}))]
    #[case::success_200(ResponseMapping::SUCCESS_200, json!({"data": 1}))]
    #[case::explicit_failure(ResponseMapping::SUCCESS_200, json!({"success":false,"message":"用户名已存在"}))]
    fn test_missing_code_is_failure(#[case] mapping: ResponseMapping, #[case] upstream: Value) {
        let envelope = wrap(&mapping, 200, &upstream);
        assert!(!envelope.success);
        assert_eq!(envelope.code, 200);
    }

    #[test]
    fn test_missing_code_keeps_upstream_message() {
        let envelope = wrap(
            &ResponseMapping::SUCCESS_200,
            200,
            &json!({"success":false,"message":"用户名已存在"}),
        );
        assert_eq!(envelope.message, "用户名已存在");

        let defaulted = wrap(&ResponseMapping::SUCCESS_200, 200, &json!({"data": 1}));
        assert_eq!(defaulted.message, DEFAULT_FAILURE_MESSAGE);
    }

    #[rstest]
    #[case::explicit_success(json!({"success":true,"data":{}}), true, 200)]
    #[case::float_code(json!({"code":200.0}), true, 200)]
    #[case::code_wins_over_flag(json!({"code":500,"success":true}), false, 500)]
    fn test_success_200_signals(
        #[case] upstream: Value,
        #[case] success: bool,
        #[case] code: i64,
    ) {
        let envelope = wrap(&ResponseMapping::SUCCESS_200, 200, &upstream);
        assert_eq!(envelope.success, success);
        assert_eq!(envelope.code, code);
    }

    #[test]
    fn test_message_and_data_mapping() {
        let envelope = wrap(
            &ResponseMapping::SUCCESS_ZERO,
            200,
            &json!({"code":1002,"msg":"余额不足"}),
        );
        assert_eq!(envelope.message, "余额不足");
        assert_eq!(envelope.data, Value::Null);

        let defaulted = wrap(&ResponseMapping::SUCCESS_ZERO, 200, &json!({"code":7}));
        assert_eq!(defaulted.message, DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn test_array_reply_becomes_data() {
        let envelope = wrap(&ResponseMapping::SUCCESS_200, 200, &json!([1, 2, 3]));
        assert!(!envelope.success);
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.data, json!([1, 2, 3]));
    }

    #[test]
    fn test_client_envelope_is_reserialized() {
        let relayed = relay(
            &BANK_LIST,
            UpstreamResponse::json(200, br#"{"code":0,"data":[{"id":"c1"}]}"#.to_vec()),
        )
        .unwrap();

        let envelope = envelope_of(&relayed);
        assert!(envelope.success);
        assert_eq!(envelope.data, json!([{"id": "c1"}]));
        assert_eq!(relayed.content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_non_success_status_is_relayed_verbatim() {
        let response = UpstreamResponse {
            status: 422,
            content_type: Some("text/plain".to_string()),
            body: b"card rejected".to_vec(),
        };

        match relay(&BANK_LIST, response) {
            Err(AppError::UpstreamError { status, content_type, body }) => {
                assert_eq!(status, 422);
                assert_eq!(content_type.as_deref(), Some("text/plain"));
                assert_eq!(body, b"card rejected".to_vec());
            }
            other => panic!("expected UpstreamError, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_success_is_server_error() {
        let response = UpstreamResponse {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: b"<html>maintenance</html>".to_vec(),
        };
        assert!(matches!(relay(&BALANCE, response), Err(AppError::ServerError(_))));
    }

    #[test]
    fn test_login_issues_token_only_on_success() {
        let ok = relay(
            &LOGIN,
            UpstreamResponse::json(200, br#"{"code":200,"data":{"token":"jwt-abc"}}"#.to_vec()),
        )
        .unwrap();
        assert_eq!(ok.issued_token.as_deref(), Some("jwt-abc"));

        let fallback = relay(
            &LOGIN,
            UpstreamResponse::json(200, br#"{"code":200,"token":"jwt-top"}"#.to_vec()),
        )
        .unwrap();
        assert_eq!(fallback.issued_token.as_deref(), Some("jwt-top"));

        let rejected = relay(
            &LOGIN,
            UpstreamResponse::json(
                200,
                r#"{"code":401,"message":"密码错误","data":{"token":"x"}}"#.as_bytes().to_vec(),
            ),
        )
        .unwrap();
        assert_eq!(rejected.issued_token, None);
        assert!(!envelope_of(&rejected).success);
    }
}
