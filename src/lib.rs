use actix_web::web::{self, Data, JsonConfig, PathConfig};
use actix_web::{App, HttpServer, ResponseError};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod envelope;
pub mod error;
mod seed;

pub use config::ServerConfig;
pub use error::Error;

use crate::database::{Database, SqliteDatabase};

/// Registers the campaign routes and the extractor error formats.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // missing or mistyped fields are 422, unparseable payloads are 400
        Error::from_json_error(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .service(
        web::scope("/api/v1")
            .service(campaign::endpoints::get_campaigns)
            .service(campaign::endpoints::get_campaign_by_id)
            .service(campaign::endpoints::create_campaign)
            .service(campaign::endpoints::update_campaign)
            .service(campaign::endpoints::delete_campaign),
    )
    .default_service(web::to(|| async { Error::PathNotFound.error_response() }));
}

/// Opens and prepares the database, serves until shutdown, then closes the
/// connection pool.
pub async fn run(config: ServerConfig) -> Result<(), Error> {
    info!("opening database: {}", config.database_path.display());
    let database = SqliteDatabase::connect(&config.database_path, config.max_connections).await?;
    database.initialize().await?;

    let db = Data::new(Box::new(database) as Box<dyn Database>);
    let app_db = db.clone();

    info!("listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(app_db.clone())
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await?;

    info!("closing database");
    db.close().await;

    Ok(())
}
