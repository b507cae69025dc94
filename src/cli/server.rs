use actix_web::middleware::ErrorHandlers;
use actix_web::web;
use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use roster::http::util::{handle_actix_web_error, QuieterRootSpanBuilder};
use roster::{config, database, App};

/// Expose the roster HTTP API server
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

#[derive(Debug, Error)]
#[error("Failed to start server")]
pub struct StartServerError;

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
    let mut config = config::Server::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(config.workers)
        .build()
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(serve(config))
}

async fn serve(config: config::Server) -> Result<(), StartServerError> {
    let workers = config.workers;
    let addr = (config.ip, config.port);

    let app = App::new(config).await.change_context(StartServerError)?;
    database::migrations::run_pending(&app.primary_db)
        .await
        .change_context(StartServerError)?;

    tracing::info!("listening on {}:{}", addr.0, addr.1);

    actix_web::HttpServer::new(move || {
        actix_web::App::new()
            .app_data(web::Data::new(app.clone()))
            .wrap(TracingLogger::<QuieterRootSpanBuilder>::new())
            .wrap(ErrorHandlers::new().default_handler(handle_actix_web_error))
            .configure(roster::http::controllers::configure)
    })
    .workers(workers)
    .bind(addr)
    .change_context(StartServerError)
    .attach_printable("could not bind server address")?
    .run()
    .await
    .change_context(StartServerError)
}

impl ServerCommand {
    fn override_config(&self, config: &mut config::Server) {
        // override server configurations if set by the cli
        if let Some(address) = self.address {
            config.ip = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        if let Some(workers) = self.workers {
            config.workers = workers.get();
        }
    }
}
