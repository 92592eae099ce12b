use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, NormalizePath};
use actix_web::web::{self, Data, JsonConfig, PathConfig, ServiceConfig};
use actix_web::{App, HttpResponse, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod health;
pub mod typedid;
pub mod utils;

pub use campaign::{CampaignBody, CreateCampaignBody, UpdateCampaignStatusBody};
pub use error::{Error, ErrorDetails};

use crate::config::{Config, Environment};
use crate::database::{Database, MySqlDatabase};

/// Registers every route along with the extractor configs that turn bad
/// input into envelope errors.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::update_campaign_status)
    .service(campaign::endpoints::delete_campaign)
    .service(health::health)
    .default_service(web::to(route_not_found));
}

async fn route_not_found() -> Result<HttpResponse, Error> {
    Err(Error::PathNotFound)
}

/// Middleware that fills in internal error details on 500 responses for apps
/// that carry `ErrorDetails(true)`.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(
        StatusCode::INTERNAL_SERVER_ERROR,
        error::render_internal_details,
    )
}

fn cors(frontend_url: Option<&str>) -> Cors {
    let cors = match frontend_url {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };

    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

/// Builds the server on an already bound listener. The returned server does
/// nothing until it is awaited or spawned.
pub fn serve(
    db: Box<dyn Database>,
    listener: TcpListener,
    frontend_url: Option<String>,
    details: ErrorDetails,
) -> Result<Server, Error> {
    let db = Data::new(db);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .app_data(details)
            .wrap(error_handlers())
            .wrap(cors(frontend_url.as_deref()))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub async fn run(config: Config) -> Result<(), Error> {
    let details = ErrorDetails(config.environment == Environment::Development);

    let db = MySqlDatabase::connect_lazy(&config)?;
    actix_web::rt::spawn(database::check_connection(db.pool().clone()));

    let listener = TcpListener::bind((config.host.as_str(), config.port))?;
    info!(
        "server listening on {}:{} ({:?})",
        config.host, config.port, config.environment
    );

    serve(Box::new(db), listener, config.frontend_url.clone(), details)?.await?;

    Ok(())
}
