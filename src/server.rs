use actix_cors::Cors;
use actix_web::{get, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web_opentelemetry::RequestTracing;

use crate::auth;
use crate::config::Config;
use crate::db;
use crate::errors::ServiceError;
use crate::events;
use crate::game_types;
use crate::games;
use crate::profile;
use crate::stats;

pub type Response = Result<HttpResponse, ServiceError>;

#[get("/health")]
async fn health(_: HttpRequest) -> &'static str {
    "ok"
}

/// Request bodies are limited to 4KB, a body that can't be parsed
/// is answered with a 400 and the reason.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(4096)
        .error_handler(|error, _| {
            debug!("rejected request body: {}", error);
            ServiceError::Validation(error.to_string()).into()
        })
}

/// a query string that can't be parsed is answered like a bad body
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|error, _| {
        debug!("rejected query string: {}", error);
        ServiceError::Validation(error.to_string()).into()
    })
}

/// path segments like `/events/abc` that aren't ids
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|error, _| {
        debug!("rejected path: {}", error);
        ServiceError::Validation(error.to_string()).into()
    })
}

fn cors() -> Cors {
    match Config::allowed_origin() {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
        None => Cors::default(),
    }
}

pub async fn launch(db_pool: db::Pool) -> std::io::Result<()> {
    let stats = web::Data::new(stats::Stats::new());

    let address = format!("{}:{}", Config::api_host(), Config::api_port());
    info!("listening on {}", address);

    HttpServer::new(move || {
        App::new()
            .data(db_pool.clone())
            .app_data(stats.clone())
            .wrap(cors())
            .wrap(auth::identity_service(
                Config::session_private_key().as_bytes(),
            ))
            .wrap(middleware::DefaultHeaders::new().header("X-Version", env!("CARGO_PKG_VERSION")))
            .wrap(middleware::Logger::default())
            .wrap(stats::Middleware::default())
            .wrap(RequestTracing::new())
            .wrap(sentry_actix::Sentry::new())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(web::PayloadConfig::default().limit(262_144))
            .service(health)
            .service(stats::route)
            .configure(auth::routes::init_routes)
            .configure(events::routes::register)
            .configure(games::routes::register)
            .configure(game_types::routes::register)
            .configure(profile::routes::register)
    })
    .bind(address)?
    .run()
    .await
}
