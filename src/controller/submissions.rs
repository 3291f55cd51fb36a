use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};

use chrono::Utc;

use sqlx::SqlitePool;

use crate::domain::ClientIp;
use crate::error::{RestError, RestResult};
use crate::gatekeeper::{Gatekeeper, Verdict};

use super::LandingPage;

/// Landing page form endpoint.
///
/// The form is read as a map since the email field name is configurable.
/// A missing field is handled like an empty one.
#[tracing::instrument(
    name = "Submit an email address",
    skip(req, pool, gatekeeper, page, form)
)]
pub async fn create(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    gatekeeper: web::Data<Gatekeeper>,
    page: web::Data<LandingPage>,
    form: web::Form<HashMap<String, String>>,
) -> RestResult<HttpResponse> {
    let email = form
        .get(page.email_form_key())
        .map(String::as_str)
        .unwrap_or_default();

    let ip = ClientIp::from_request(&req).ok_or_else(|| {
        tracing::error!("Failed to resolve client address");
        RestError::InternalError("Client address unavailable".into())
    })?;

    let now = Utc::now().timestamp();

    match gatekeeper
        .evaluate(pool.get_ref(), email, ip.as_ref(), now)
        .await?
    {
        // The record is stored at this point, a missing page must not read as a failure
        Verdict::Accepted => Ok(page
            .render()
            .await
            .unwrap_or_else(|_| HttpResponse::Ok().body("Thank you, we will let you know"))),
        Verdict::Rejected(rejection) => Err(rejection.into()),
    }
}
