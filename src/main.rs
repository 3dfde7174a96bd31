//! levelup is the backend of a tabletop game meetup:
//! gamers register games, schedule events to play them and sign up for each other's events.
#![warn(missing_debug_implementations, rust_2018_idioms)]

#[macro_use]
extern crate diesel;

#[macro_use]
extern crate diesel_migrations;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;

use anyhow::{anyhow, Error};
use dotenv::dotenv;

#[macro_use]
mod macros;

#[cfg(test)]
#[macro_use]
mod testing;

mod auth;
mod config;
mod db;
mod errors;
mod events;
mod game_types;
mod gamers;
mod games;
mod profile;
mod schema;
mod server;
mod stats;
mod users;
mod validator;

use config::Config;

#[actix_web::main]
async fn main() -> anyhow::Result<(), Error> {
    init().await?;

    Ok(())
}

async fn init() -> anyhow::Result<(), Error> {
    dotenv().ok();
    Config::init();

    let (tracer, _uninstall) = opentelemetry_jaeger::new_pipeline()
        .with_service_name("levelup")
        .with_agent_endpoint(Config::opentelemetry_endpoint())
        .install()
        .map_err(|e| anyhow!("unable to connect to opentelemetry agent: {}", e))?;

    // Create a tracing layer with the configured tracer
    let opentelemetry = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(opentelemetry)
        .try_init()
        .map_err(|e| anyhow!("unable to initialize the tracer: {}", e))?;

    let _sentry = Config::sentry_dsn().map(|dsn| {
        info!("reporting errors to sentry");
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    debug!("running database migrations");
    db::migrate(Config::database_url())?;

    let pool = db::build_connection_pool(Config::database_url())?;

    debug!("launching the actix webserver");
    server::launch(pool).await?;

    Ok(())
}
