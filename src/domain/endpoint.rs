//! 프록시 엔드포인트 정의
//!
//! 모든 클라이언트 라우트는 하나의 파라미터 객체(`EndpointSpec`)로 기술되며,
//! 단일 제네릭 어댑터가 이를 해석하여 요청을 백엔드로 전달합니다.
//!
//! ```text
//! EndpointSpec { method, route, upstream_path, required, requires_auth, body, envelope, session }
//!        │
//!        ▼ (설정 파일의 경로 오버라이드 적용)
//! ResolvedEndpoint { spec, upstream_path }
//!        │
//!        ▼
//! ProxyService::dispatch
//! ```

/// 프록시가 지원하는 HTTP 메서드
///
/// actix-web과 reqwest가 서로 다른 `http` 크레이트 버전을 사용하므로
/// 양쪽으로 변환 가능한 자체 열거형을 둡니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// 필수 필드를 읽어올 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Query,
    Body,
}

impl ProxyMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyMethod::Get => "GET",
            ProxyMethod::Post => "POST",
            ProxyMethod::Put => "PUT",
            ProxyMethod::Patch => "PATCH",
            ProxyMethod::Delete => "DELETE",
        }
    }

    pub fn to_actix(self) -> actix_web::http::Method {
        match self {
            ProxyMethod::Get => actix_web::http::Method::GET,
            ProxyMethod::Post => actix_web::http::Method::POST,
            ProxyMethod::Put => actix_web::http::Method::PUT,
            ProxyMethod::Patch => actix_web::http::Method::PATCH,
            ProxyMethod::Delete => actix_web::http::Method::DELETE,
        }
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            ProxyMethod::Get => reqwest::Method::GET,
            ProxyMethod::Post => reqwest::Method::POST,
            ProxyMethod::Put => reqwest::Method::PUT,
            ProxyMethod::Patch => reqwest::Method::PATCH,
            ProxyMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// GET/DELETE는 쿼리스트링에서, 나머지는 JSON 본문에서 필드를 읽습니다.
    pub fn field_source(self) -> FieldSource {
        match self {
            ProxyMethod::Get | ProxyMethod::Delete => FieldSource::Query,
            _ => FieldSource::Body,
        }
    }
}

/// 필수 필드 검증 규칙
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// 존재하고, null이 아니며, 공백 문자열이 아니어야 함
    Present,
    /// 0보다 큰 숫자(또는 숫자 문자열)여야 함
    PositiveAmount { shape_message: &'static str },
}

/// 필수 필드와 누락 시 반환할 메시지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    pub name: &'static str,
    pub message: &'static str,
    pub rule: FieldRule,
}

impl RequiredField {
    pub const fn present(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            message,
            rule: FieldRule::Present,
        }
    }

    pub const fn positive_amount(
        name: &'static str,
        message: &'static str,
        shape_message: &'static str,
    ) -> Self {
        Self {
            name,
            message,
            rule: FieldRule::PositiveAmount { shape_message },
        }
    }
}

/// 업스트림으로 전달할 본문의 형태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// 수신한 바이트를 그대로 전달
    Verbatim,
    /// 나열된 최상위 필드만 골라서 전달
    Pick(&'static [&'static str]),
}

/// 업스트림 응답 필드를 클라이언트 envelope로 옮기는 선언적 매핑 테이블
///
/// 각 키 목록은 앞에서부터 검사하며, 처음 존재하는 키가 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseMapping {
    pub success_code: i64,
    pub code_keys: &'static [&'static str],
    pub message_keys: &'static [&'static str],
    pub data_keys: &'static [&'static str],
}

const DEFAULT_CODE_KEYS: &[&str] = &["code", "status"];
const DEFAULT_MESSAGE_KEYS: &[&str] = &["message", "msg"];
const DEFAULT_DATA_KEYS: &[&str] = &["data", "result"];

impl ResponseMapping {
    /// `code == 0`을 성공으로 보는 백엔드 응답
    pub const SUCCESS_ZERO: Self = Self::with_success_code(0);

    /// `code == 200`을 성공으로 보는 백엔드 응답
    pub const SUCCESS_200: Self = Self::with_success_code(200);

    pub const fn with_success_code(success_code: i64) -> Self {
        Self {
            success_code,
            code_keys: DEFAULT_CODE_KEYS,
            message_keys: DEFAULT_MESSAGE_KEYS,
            data_keys: DEFAULT_DATA_KEYS,
        }
    }
}

/// 응답 중계 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStyle {
    /// 업스트림 상태와 본문을 그대로 전달
    PassThrough,
    /// `{success, code, message, data, timestamp}`로 재구성
    Client(ResponseMapping),
}

/// 성공 응답 이후 세션 쿠키에 미치는 효과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    None,
    /// 응답 본문에서 토큰을 찾아 세션 쿠키로 설정 (JSON pointer 목록)
    IssueToken { token_pointers: &'static [&'static str] },
}

/// 하나의 클라이언트 라우트를 기술하는 파라미터 객체
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub method: ProxyMethod,
    pub route: &'static str,
    /// `{param}` 자리표시자를 포함할 수 있는 업스트림 경로
    pub upstream_path: &'static str,
    pub required: &'static [RequiredField],
    pub requires_auth: bool,
    pub body: BodyShape,
    pub envelope: EnvelopeStyle,
    pub session: SessionEffect,
}

impl EndpointSpec {
    /// 인증이 필요한 pass-through 엔드포인트를 생성합니다.
    ///
    /// 나머지 속성은 `with_*` 빌더로 지정합니다.
    pub const fn new(
        name: &'static str,
        method: ProxyMethod,
        route: &'static str,
        upstream_path: &'static str,
    ) -> Self {
        Self {
            name,
            method,
            route,
            upstream_path,
            required: &[],
            requires_auth: true,
            body: BodyShape::Verbatim,
            envelope: EnvelopeStyle::PassThrough,
            session: SessionEffect::None,
        }
    }

    pub const fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub const fn with_required(mut self, required: &'static [RequiredField]) -> Self {
        self.required = required;
        self
    }

    pub const fn with_body(mut self, body: BodyShape) -> Self {
        self.body = body;
        self
    }

    pub const fn with_envelope(mut self, envelope: EnvelopeStyle) -> Self {
        self.envelope = envelope;
        self
    }

    pub const fn issuing_token(mut self, token_pointers: &'static [&'static str]) -> Self {
        self.session = SessionEffect::IssueToken { token_pointers };
        self
    }

    pub fn field_source(&self) -> FieldSource {
        self.method.field_source()
    }

    pub fn required_field(&self, name: &str) -> Option<&RequiredField> {
        self.required.iter().find(|field| field.name == name)
    }
}

/// 설정 오버라이드가 반영된 엔드포인트
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub spec: &'static EndpointSpec,
    pub upstream_path: String,
}

impl ResolvedEndpoint {
    pub fn new(spec: &'static EndpointSpec, upstream_path: impl Into<String>) -> Self {
        Self {
            spec,
            upstream_path: upstream_path.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn path_params(&self) -> Vec<&str> {
        template_params(&self.upstream_path)
    }
}

/// 경로 템플릿에서 `{param}` 이름들을 순서대로 추출합니다.
pub fn template_params(template: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) => {
                params.push(&after_open[..close]);
                rest = &after_open[close + 1..];
            }
            None => break,
        }
    }

    params
}
