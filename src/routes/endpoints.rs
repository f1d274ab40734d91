//! 프록시 엔드포인트 테이블
//!
//! 클라이언트 라우트 하나당 `EndpointSpec` 하나를 선언합니다.
//! 기능 영역별 그룹: 인증, 사용자, 은행카드, 지갑, 대여, 작업지시(work order), 알림, 작업(task)

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::config::{ConfigError, UpstreamConfig};
use crate::domain::endpoint::template_params;
use crate::domain::{
    BodyShape, EndpointSpec, EnvelopeStyle, ProxyMethod, RequiredField, ResolvedEndpoint,
    ResponseMapping,
};

const CODE_ZERO: EnvelopeStyle = EnvelopeStyle::Client(ResponseMapping::SUCCESS_ZERO);
const CODE_200: EnvelopeStyle = EnvelopeStyle::Client(ResponseMapping::SUCCESS_200);

/// 로그인 응답에서 토큰을 찾을 위치
const LOGIN_TOKEN_POINTERS: &[&str] = &["/data/token", "/data/accessToken", "/token"];

// 인증
const LOGIN_FIELDS: &[RequiredField] = &[
    RequiredField::present("username", "请输入用户名"),
    RequiredField::present("password", "请输入密码"),
];
const REGISTER_FIELDS: &[RequiredField] = &[
    RequiredField::present("username", "请输入用户名"),
    RequiredField::present("password", "请输入密码"),
    RequiredField::present("phone", "请输入手机号"),
];

// 사용자
const CHANGE_PASSWORD_FIELDS: &[RequiredField] = &[
    RequiredField::present("oldPassword", "请输入原密码"),
    RequiredField::present("newPassword", "请输入新密码"),
];

// 은행카드
const ADD_BANK_FIELDS: &[RequiredField] = &[
    RequiredField::present("bankName", "请选择开户银行"),
    RequiredField::present("cardNumber", "请输入银行卡号"),
    RequiredField::present("cardholderName", "请输入持卡人姓名"),
];
const CARD_ID_FIELDS: &[RequiredField] = &[RequiredField::present("cardId", "缺少银行卡ID")];

// 지갑
const RECHARGE_FIELDS: &[RequiredField] = &[RequiredField::positive_amount(
    "amount",
    "请输入充值金额",
    "充值金额必须大于0",
)];
const WITHDRAW_FIELDS: &[RequiredField] = &[
    RequiredField::positive_amount("amount", "请输入提现金额", "提现金额必须大于0"),
    RequiredField::present("bankCardId", "请选择提现银行卡"),
];

// 대여
const OFFER_CREATE_FIELDS: &[RequiredField] = &[
    RequiredField::present("accountType", "请选择账号类型"),
    RequiredField::positive_amount("pricePerHour", "请输入每小时租金", "租金必须大于0"),
];
const OFFER_ID_FIELDS: &[RequiredField] = &[RequiredField::present("offerId", "缺少出租信息ID")];
const REQUEST_CREATE_FIELDS: &[RequiredField] = &[
    RequiredField::present("accountType", "请选择账号类型"),
    RequiredField::positive_amount("budget", "请输入预算", "预算必须大于0"),
];
const ORDER_CREATE_FIELDS: &[RequiredField] = &[
    RequiredField::present("offerId", "缺少出租信息ID"),
    RequiredField::positive_amount("durationHours", "请输入租用时长", "租用时长必须大于0"),
];

// 작업지시
const WORK_ORDER_CREATE_FIELDS: &[RequiredField] = &[
    RequiredField::present("title", "请输入工单标题"),
    RequiredField::present("content", "请输入工单内容"),
];
const WORK_ORDER_ID_FIELDS: &[RequiredField] =
    &[RequiredField::present("workOrderId", "缺少工单ID")];
const WORK_ORDER_REPLY_FIELDS: &[RequiredField] = &[
    RequiredField::present("workOrderId", "缺少工单ID"),
    RequiredField::present("content", "请输入回复内容"),
];

// 알림
const NOTIFICATION_ID_FIELDS: &[RequiredField] =
    &[RequiredField::present("notificationId", "缺少通知ID")];

// 작업
const TASK_PUBLISH_FIELDS: &[RequiredField] = &[
    RequiredField::present("title", "请输入任务标题"),
    RequiredField::present("description", "请输入任务描述"),
    RequiredField::positive_amount("reward", "请输入任务赏金", "赏金必须大于0"),
];
const TASK_ID_FIELDS: &[RequiredField] = &[RequiredField::present("taskId", "缺少任务ID")];

/// 모든 프록시 엔드포인트
pub static ENDPOINTS: &[EndpointSpec] = &[
    // 인증
    EndpointSpec::new("auth.login", ProxyMethod::Post, "/api/auth/login", "/auth/login")
        .public()
        .with_required(LOGIN_FIELDS)
        .with_envelope(CODE_200)
        .issuing_token(LOGIN_TOKEN_POINTERS),
    EndpointSpec::new("auth.register", ProxyMethod::Post, "/api/auth/register", "/auth/register")
        .public()
        .with_required(REGISTER_FIELDS)
        .with_envelope(CODE_200),
    // 사용자
    EndpointSpec::new("users.info", ProxyMethod::Get, "/api/users/info", "/users/info"),
    EndpointSpec::new(
        "users.changepwd",
        ProxyMethod::Post,
        "/api/users/changepwd",
        "/users/changepwd",
    )
    .with_required(CHANGE_PASSWORD_FIELDS)
    .with_body(BodyShape::Pick(&["oldPassword", "newPassword"])),
    EndpointSpec::new("users.update", ProxyMethod::Put, "/api/users/update", "/users/update"),
    // 은행카드
    EndpointSpec::new("bank.list", ProxyMethod::Get, "/api/bank/banklist", "/bank-cards")
        .with_envelope(CODE_ZERO),
    EndpointSpec::new("bank.add", ProxyMethod::Post, "/api/bank/addbank", "/bank-cards")
        .with_required(ADD_BANK_FIELDS)
        .with_envelope(CODE_ZERO),
    EndpointSpec::new(
        "bank.setdefault",
        ProxyMethod::Put,
        "/api/bank/setdefaultbank",
        "/bank-cards/{cardId}/default",
    )
    .with_required(CARD_ID_FIELDS)
    .with_envelope(CODE_ZERO),
    EndpointSpec::new(
        "bank.delete",
        ProxyMethod::Delete,
        "/api/bank/deletebank",
        "/bank-cards/{cardId}",
    )
    .with_required(CARD_ID_FIELDS)
    .with_envelope(CODE_ZERO),
    // 지갑
    EndpointSpec::new(
        "wallet.balance",
        ProxyMethod::Get,
        "/api/walletmanagement/balance",
        "/wallet/balance",
    ),
    EndpointSpec::new(
        "wallet.transactions",
        ProxyMethod::Get,
        "/api/walletmanagement/transactions",
        "/wallet/transactions",
    ),
    EndpointSpec::new(
        "wallet.recharge",
        ProxyMethod::Post,
        "/api/walletmanagement/recharge",
        "/wallet/recharge",
    )
    .with_required(RECHARGE_FIELDS),
    EndpointSpec::new(
        "wallet.withdraw",
        ProxyMethod::Post,
        "/api/walletmanagement/withdraw",
        "/wallet/withdraw",
    )
    .with_required(WITHDRAW_FIELDS),
    // 대여
    EndpointSpec::new("rental.offers", ProxyMethod::Get, "/api/rental/offers", "/rental/offers"),
    EndpointSpec::new(
        "rental.offer_create",
        ProxyMethod::Post,
        "/api/rental/offers/create",
        "/rental/offers",
    )
    .with_required(OFFER_CREATE_FIELDS)
    .with_envelope(CODE_200),
    EndpointSpec::new(
        "rental.offer_detail",
        ProxyMethod::Get,
        "/api/rental/offers/detail",
        "/rental/offers/{offerId}",
    )
    .with_required(OFFER_ID_FIELDS),
    EndpointSpec::new(
        "rental.requests",
        ProxyMethod::Get,
        "/api/rental/requests",
        "/rental/requests",
    ),
    EndpointSpec::new(
        "rental.request_create",
        ProxyMethod::Post,
        "/api/rental/requests/create",
        "/rental/requests",
    )
    .with_required(REQUEST_CREATE_FIELDS)
    .with_envelope(CODE_200),
    EndpointSpec::new(
        "rental.order_create",
        ProxyMethod::Post,
        "/api/rental/orders/create",
        "/rental/orders",
    )
    .with_required(ORDER_CREATE_FIELDS)
    .with_envelope(CODE_200),
    EndpointSpec::new("rental.orders", ProxyMethod::Get, "/api/rental/orders", "/rental/orders"),
    // 작업지시
    EndpointSpec::new("workorder.list", ProxyMethod::Get, "/api/workOrder/list", "/work-orders"),
    EndpointSpec::new(
        "workorder.create",
        ProxyMethod::Post,
        "/api/workOrder/create",
        "/work-orders",
    )
    .with_required(WORK_ORDER_CREATE_FIELDS)
    .with_envelope(CODE_200),
    EndpointSpec::new(
        "workorder.detail",
        ProxyMethod::Get,
        "/api/workOrder/detail",
        "/work-orders/{workOrderId}",
    )
    .with_required(WORK_ORDER_ID_FIELDS),
    EndpointSpec::new(
        "workorder.reply",
        ProxyMethod::Post,
        "/api/workOrder/reply",
        "/work-orders/{workOrderId}/replies",
    )
    .with_required(WORK_ORDER_REPLY_FIELDS)
    .with_envelope(CODE_200),
    // 알림
    EndpointSpec::new(
        "notifications.list",
        ProxyMethod::Get,
        "/api/notifications/list",
        "/notifications",
    ),
    EndpointSpec::new(
        "notifications.unread",
        ProxyMethod::Get,
        "/api/notifications/unread-count",
        "/notifications/unread-count",
    ),
    EndpointSpec::new(
        "notifications.read",
        ProxyMethod::Put,
        "/api/notifications/read",
        "/notifications/{notificationId}/read",
    )
    .with_required(NOTIFICATION_ID_FIELDS)
    .with_envelope(CODE_ZERO),
    EndpointSpec::new(
        "notifications.read_all",
        ProxyMethod::Put,
        "/api/notifications/read-all",
        "/notifications/read-all",
    )
    .with_envelope(CODE_ZERO),
    // 작업
    EndpointSpec::new("task.publish", ProxyMethod::Post, "/api/task/publish", "/tasks")
        .with_required(TASK_PUBLISH_FIELDS)
        .with_envelope(CODE_200),
    EndpointSpec::new("task.list", ProxyMethod::Get, "/api/task/list", "/tasks"),
    EndpointSpec::new(
        "task.accept",
        ProxyMethod::Post,
        "/api/task/accept",
        "/tasks/{taskId}/accept",
    )
    .with_required(TASK_ID_FIELDS)
    .with_envelope(CODE_200),
];

/// 이름으로 엔드포인트를 찾기 위한 인덱스
static ENDPOINT_INDEX: Lazy<HashMap<&'static str, &'static EndpointSpec>> =
    Lazy::new(|| ENDPOINTS.iter().map(|spec| (spec.name, spec)).collect());

pub fn find_endpoint(name: &str) -> Option<&'static EndpointSpec> {
    ENDPOINT_INDEX.get(name).copied()
}

/// 설정의 경로 오버라이드를 반영하여 라우팅 테이블을 만듭니다.
///
/// # Errors
///
/// - 존재하지 않는 엔드포인트 이름에 대한 오버라이드
/// - 경로 자리표시자가 필수 필드로 선언되지 않은 경우
pub fn resolve_endpoints(
    config: &UpstreamConfig,
) -> Result<Vec<Arc<ResolvedEndpoint>>, ConfigError> {
    if let Some(unknown) = config
        .endpoint_paths
        .keys()
        .find(|name| find_endpoint(name).is_none())
    {
        return Err(ConfigError::Endpoint {
            endpoint: unknown.clone(),
            reason: "알 수 없는 엔드포인트".to_string(),
        });
    }

    ENDPOINTS
        .iter()
        .map(|spec| {
            let path = config
                .endpoint_paths
                .get(spec.name)
                .map(String::as_str)
                .unwrap_or(spec.upstream_path);

            if let Some(param) = template_params(path)
                .into_iter()
                .find(|param| spec.required_field(param).is_none())
            {
                return Err(ConfigError::Endpoint {
                    endpoint: spec.name.to_string(),
                    reason: format!("경로 파라미터 {{{}}}가 필수 필드가 아닙니다", param),
                });
            }

            Ok(Arc::new(ResolvedEndpoint::new(spec, path)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_routes_and_names_are_unique() {
        let routes: HashSet<_> = ENDPOINTS.iter().map(|spec| spec.route).collect();
        let names: HashSet<_> = ENDPOINTS.iter().map(|spec| spec.name).collect();
        assert_eq!(routes.len(), ENDPOINTS.len());
        assert_eq!(names.len(), ENDPOINTS.len());
    }

    #[test]
    fn test_every_path_param_is_required() {
        for spec in ENDPOINTS {
            for param in template_params(spec.upstream_path) {
                assert!(
                    spec.required_field(param).is_some(),
                    "{} uses {{{}}} without requiring it",
                    spec.name,
                    param
                );
            }
        }
    }

    #[test]
    fn test_only_auth_routes_are_public() {
        for spec in ENDPOINTS {
            assert_eq!(
                spec.requires_auth,
                !spec.name.starts_with("auth."),
                "{} has unexpected auth requirement",
                spec.name
            );
        }
    }

    #[test]
    fn test_find_endpoint() {
        let spec = find_endpoint("bank.setdefault").unwrap();
        assert_eq!(spec.route, "/api/bank/setdefaultbank");
        assert_eq!(spec.required[0].message, "缺少银行卡ID");
        assert!(find_endpoint("bank.unknown").is_none());
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let mut config = UpstreamConfig::default();
        config
            .endpoint_paths
            .insert("wallet.balance".to_string(), "/v2/wallet/balance".to_string());

        let table = resolve_endpoints(&config).unwrap();
        assert_eq!(table.len(), ENDPOINTS.len());

        let balance = table.iter().find(|ep| ep.name() == "wallet.balance").unwrap();
        assert_eq!(balance.upstream_path, "/v2/wallet/balance");
        let list = table.iter().find(|ep| ep.name() == "bank.list").unwrap();
        assert_eq!(list.upstream_path, "/bank-cards");
    }

    #[test]
    fn test_resolve_rejects_unknown_override() {
        let mut config = UpstreamConfig::default();
        config
            .endpoint_paths
            .insert("wallet.unknown".to_string(), "/x".to_string());

        assert!(matches!(
            resolve_endpoints(&config),
            Err(ConfigError::Endpoint { endpoint, .. }) if endpoint == "wallet.unknown"
        ));
    }

    #[test]
    fn test_resolve_rejects_unbound_param() {
        let mut config = UpstreamConfig::default();
        config
            .endpoint_paths
            .insert("wallet.balance".to_string(), "/wallet/{walletId}/balance".to_string());

        assert!(matches!(
            resolve_endpoints(&config),
            Err(ConfigError::Endpoint { endpoint, .. }) if endpoint == "wallet.balance"
        ));
    }
}
