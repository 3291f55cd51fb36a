use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use sqlx::SqlitePool;

use tracing_actix_web::TracingLogger;

use crate::controller::{self, LandingPage};
use crate::gatekeeper::Gatekeeper;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    pool: SqlitePool,
    gatekeeper: Gatekeeper,
    page: LandingPage,
) -> anyhow::Result<Server> {
    // Wrap application data
    let pool = web::Data::new(pool);
    let gatekeeper = web::Data::new(gatekeeper);
    let page = web::Data::new(page);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .app_data(gatekeeper.clone())
            .app_data(page.clone())
            .service(health_check)
            .service(controller::resource())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
