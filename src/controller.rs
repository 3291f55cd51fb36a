use actix_web::dev::HttpServiceFactory;
use actix_web::{web, HttpResponse};

mod page;
mod submissions;

pub use page::LandingPage;

/// Requests with a method the landing page does not handle
#[tracing::instrument(name = "Unhandled method")]
async fn unhandled_method() -> HttpResponse {
    HttpResponse::BadRequest().body("Bad Request")
}

/// Landing page endpoints, mounted at the root
pub fn resource() -> impl HttpServiceFactory {
    web::resource("/")
        .route(web::get().to(page::show))
        .route(web::post().to(submissions::create))
        .default_service(web::to(unhandled_method))
}
