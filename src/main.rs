//! 퍼블리시 태스크 게이트웨이 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동합니다.
//! 설정을 로드하고 업스트림 클라이언트와 라우팅 테이블을 구성한 뒤 서버를 실행합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use publish_task_gateway::config::{
    ConfigError, EnvSource, Environment, RateLimitConfig, ServerConfig, SessionConfig,
    UpstreamConfig,
};
use publish_task_gateway::middlewares::AuthMiddleware;
use publish_task_gateway::routes::{configure_all_routes, resolve_endpoints};
use publish_task_gateway::services::proxy::{ProxyService, ReqwestUpstreamClient};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    let env_file = load_env_file();
    init_logging();
    match env_file {
        Ok(loaded) => info!("{}", loaded),
        Err(e) => error!("{}", e),
    }

    info!("🚀 퍼블리시 태스크 게이트웨이 시작중...");

    let source = EnvSource::from_process();
    let environment = Environment::from_source(&source);
    info!("실행 환경: {:?}", environment);

    if let Some(analyze) = source.get("ANALYZE") {
        info!("ANALYZE={} (런타임에는 영향 없음)", analyze);
    }

    let upstream_config = UpstreamConfig::load(&source).map_err(config_failure)?;
    let session_config = SessionConfig::load(&source).map_err(config_failure)?;
    let rate_limit_config = RateLimitConfig::load(&source);

    info!(
        "📡 업스트림: {} (timeout {}s)",
        upstream_config.base_url, upstream_config.timeout_secs
    );

    let table = Arc::new(resolve_endpoints(&upstream_config).map_err(config_failure)?);
    info!("✅ 프록시 엔드포인트 {}개 등록", table.len());

    let client = ReqwestUpstreamClient::from_config(&upstream_config).map_err(|e| {
        error!("업스트림 클라이언트 생성 실패: {}", e);
        io::Error::other(e)
    })?;

    let cookie_name = session_config.cookie_name.clone();
    let service = web::Data::new(ProxyService::new(
        upstream_config,
        session_config,
        Arc::new(client),
    ));

    start_http_server(service, table, cookie_name, rate_limit_config).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화, 세션 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - Rate Limiting 설정 오류, 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(
    service: web::Data<ProxyService>,
    table: Arc<Vec<Arc<publish_task_gateway::domain::ResolvedEndpoint>>>,
    cookie_name: String,
    rate_limit_config: RateLimitConfig,
) -> io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second, rate_limit_config.burst_size
    );

    let origins = ServerConfig::cors_origins();

    HttpServer::new(move || {
        let table = table.clone();

        App::new()
            .app_data(service.clone())
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .wrap(AuthMiddleware::from_cookie(&cookie_name))
            // 라우트 설정
            .configure(move |cfg| configure_all_routes(cfg, &table))
    })
    .bind(bind_address)?
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// `RUST_LOG`가 파일에 있을 수 있으므로 로거보다 먼저 호출되며,
/// 결과 메시지는 로거 초기화 후에 출력합니다.
fn load_env_file() -> Result<String, String> {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let filename = match profile.as_str() {
        "prod" => ".env.prod",
        "dev" => ".env.dev",
        _ => {
            dotenv().ok();
            return Ok("기본 .env 파일 로드".to_string());
        }
    };

    dotenv::from_filename(filename)
        .map(|_| format!("{} 파일 로드 됨", filename))
        .map_err(|e| format!("{} 파일 로드 실패: {}", filename, e))
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// CORS 설정을 구성합니다
///
/// 세션 쿠키를 주고받아야 하므로 자격 증명을 허용합니다.
fn configure_cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .supports_credentials()
        .max_age(3600)
}

fn config_failure(e: ConfigError) -> io::Error {
    error!("설정 로드 실패: {}", e);
    io::Error::new(io::ErrorKind::InvalidInput, e)
}
