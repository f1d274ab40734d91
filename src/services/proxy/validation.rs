//! 수신 요청 파싱과 필수 필드 검증
//!
//! 검증은 업스트림 호출 전에 로컬에서 끝나며,
//! 실패 시 필드별 메시지를 담은 `ValidationError`를 반환합니다.

use actix_web::web;
use serde_json::{Map, Value};

use crate::domain::{EndpointSpec, FieldRule, FieldSource, RequiredField};
use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::is_blank;

/// 요청 본문/쿼리 형식 오류 메시지
pub const INVALID_PAYLOAD_MESSAGE: &str = "请求参数格式错误";

/// 파싱된 수신 요청
#[derive(Debug, Clone, Default)]
pub struct InboundPayload {
    pub query: Vec<(String, String)>,
    /// 본문이 비어 있으면 `None`
    pub body: Option<Value>,
    pub raw_body: Vec<u8>,
}

/// 쿼리 또는 본문에서 읽어온 필드 값
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Json(&'a Value),
}

impl FieldValue<'_> {
    fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => is_blank(text),
            FieldValue::Json(Value::Null) => true,
            FieldValue::Json(Value::String(text)) => is_blank(text),
            FieldValue::Json(_) => false,
        }
    }

    fn as_amount(&self) -> Option<f64> {
        let amount = match self {
            FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
            FieldValue::Json(Value::Number(number)) => number.as_f64(),
            FieldValue::Json(Value::String(text)) => text.trim().parse::<f64>().ok(),
            FieldValue::Json(_) => None,
        };
        amount.filter(|value| value.is_finite())
    }

    /// URL 경로 세그먼트로 쓸 수 있는 문자열 표현
    pub fn as_segment(&self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text.trim().to_string()),
            FieldValue::Json(Value::String(text)) => Some(text.trim().to_string()),
            FieldValue::Json(Value::Number(number)) => Some(number.to_string()),
            FieldValue::Json(Value::Bool(flag)) => Some(flag.to_string()),
            FieldValue::Json(_) => None,
        }
        .filter(|segment| !segment.is_empty())
    }
}

impl InboundPayload {
    /// 쿼리스트링과 원본 본문을 파싱합니다.
    ///
    /// # Errors
    ///
    /// 쿼리스트링 디코딩 실패 또는 비어 있지 않은 본문이 JSON이 아닐 때
    pub fn parse(query_string: &str, raw_body: Vec<u8>) -> AppResult<Self> {
        let query = web::Query::<Vec<(String, String)>>::from_query(query_string)
            .map_err(|_| AppError::ValidationError(INVALID_PAYLOAD_MESSAGE.to_string()))?
            .into_inner();

        let body = if raw_body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(
                serde_json::from_slice::<Value>(&raw_body)
                    .map_err(|_| AppError::ValidationError(INVALID_PAYLOAD_MESSAGE.to_string()))?,
            )
        };

        Ok(Self {
            query,
            body,
            raw_body,
        })
    }

    /// 본문을 JSON 객체로 봅니다. 본문이 없으면 `None`입니다.
    ///
    /// # Errors
    ///
    /// 본문이 있지만 객체가 아닐 때
    pub fn body_object(&self) -> AppResult<Option<&Map<String, Value>>> {
        match &self.body {
            None => Ok(None),
            Some(Value::Object(object)) => Ok(Some(object)),
            Some(_) => Err(AppError::ValidationError(INVALID_PAYLOAD_MESSAGE.to_string())),
        }
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn field(&self, source: FieldSource, name: &str) -> AppResult<Option<FieldValue<'_>>> {
        match source {
            FieldSource::Query => Ok(self.query_value(name).map(FieldValue::Text)),
            FieldSource::Body => Ok(self
                .body_object()?
                .and_then(|object| object.get(name))
                .map(FieldValue::Json)),
        }
    }
}

/// 엔드포인트의 필수 필드를 선언 순서대로 검사합니다.
///
/// 첫 번째 실패 필드의 메시지로 `ValidationError`를 반환합니다.
pub fn check_required(spec: &EndpointSpec, payload: &InboundPayload) -> AppResult<()> {
    let source = spec.field_source();
    if source == FieldSource::Body && !spec.required.is_empty() {
        payload.body_object()?;
    }

    for field in spec.required {
        check_field(field, payload.field(source, field.name)?)?;
    }

    Ok(())
}

fn check_field(field: &RequiredField, value: Option<FieldValue<'_>>) -> AppResult<()> {
    let value = match value {
        Some(value) if !value.is_blank() => value,
        _ => return Err(AppError::ValidationError(field.message.to_string())),
    };

    match field.rule {
        FieldRule::Present => Ok(()),
        FieldRule::PositiveAmount { shape_message } => match value.as_amount() {
            Some(amount) if amount > 0.0 => Ok(()),
            _ => Err(AppError::ValidationError(shape_message.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProxyMethod;
    use rstest::rstest;

    const WITHDRAW_FIELDS: &[RequiredField] = &[
        RequiredField::positive_amount("amount", "请输入提现金额", "提现金额必须大于0"),
        RequiredField::present("bankCardId", "请选择提现银行卡"),
    ];
    const DETAIL_FIELDS: &[RequiredField] = &[RequiredField::present("offerId", "缺少出租信息ID")];

    const WITHDRAW: EndpointSpec = EndpointSpec::new(
        "test.withdraw",
        ProxyMethod::Post,
        "/api/test/withdraw",
        "/wallet/withdraw",
    )
    .with_required(WITHDRAW_FIELDS);

    const DETAIL: EndpointSpec = EndpointSpec::new(
        "test.detail",
        ProxyMethod::Get,
        "/api/test/detail",
        "/rental/offers/{offerId}",
    )
    .with_required(DETAIL_FIELDS);

    fn message_of(result: AppResult<()>) -> String {
        match result {
            Err(AppError::ValidationError(message)) => message,
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    fn body(raw: &str) -> InboundPayload {
        InboundPayload::parse("", raw.as_bytes().to_vec()).unwrap()
    }

    #[rstest]
    #[case::empty_body("", "请输入提现金额")]
    #[case::empty_object("{}", "请输入提现金额")]
    #[case::null_amount(r#"{"amount":null,"bankCardId":"c1"}"#, "请输入提现金额")]
    #[case::zero_amount(r#"{"amount":0,"bankCardId":"c1"}"#, "提现金额必须大于0")]
    #[case::negative_string(r#"{"amount":"-5","bankCardId":"c1"}"#, "提现金额必须大于0")]
    #[case::not_a_number(r#"{"amount":"abc","bankCardId":"c1"}"#, "提现金额必须大于0")]
    #[case::missing_card(r#"{"amount":"100.00"}"#, "请选择提现银行卡")]
    #[case::blank_card(r#"{"amount":100,"bankCardId":"  "}"#, "请选择提现银行卡")]
    fn test_withdraw_rejections(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(message_of(check_required(&WITHDRAW, &body(raw))), expected);
    }

    #[test]
    fn test_withdraw_accepts_numeric_string_amount() {
        let payload = body(r#"{"amount":"88.80","bankCardId":"c1"}"#);
        assert!(check_required(&WITHDRAW, &payload).is_ok());
    }

    #[test]
    fn test_body_must_be_object() {
        let payload = body(r#"[{"amount":1}]"#);
        assert_eq!(
            message_of(check_required(&WITHDRAW, &payload)),
            INVALID_PAYLOAD_MESSAGE
        );
    }

    #[test]
    fn test_malformed_json_is_rejected_at_parse() {
        let result = InboundPayload::parse("", b"{amount: 1".to_vec());
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_query_fields_for_get() {
        let missing = InboundPayload::parse("page=1", Vec::new()).unwrap();
        assert_eq!(message_of(check_required(&DETAIL, &missing)), "缺少出租信息ID");

        let present = InboundPayload::parse("offerId=o-1&page=1", Vec::new()).unwrap();
        assert!(check_required(&DETAIL, &present).is_ok());
        assert_eq!(present.query_value("page"), Some("1"));
    }

    #[test]
    fn test_query_values_are_decoded() {
        let payload = InboundPayload::parse("keyword=%E7%8E%8B%E8%80%85&offerId=a%2Fb", Vec::new()).unwrap();
        assert_eq!(payload.query_value("keyword"), Some("王者"));
        assert_eq!(payload.query_value("offerId"), Some("a/b"));
    }

    #[test]
    fn test_segment_rendering() {
        let number = serde_json::json!(42);
        let object = serde_json::json!({ "id": 1 });
        assert_eq!(FieldValue::Json(&number).as_segment(), Some("42".to_string()));
        assert_eq!(FieldValue::Json(&object).as_segment(), None);
        assert_eq!(FieldValue::Text("  c-9 ").as_segment(), Some("c-9".to_string()));
    }
}
