use std::path::PathBuf;

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};

use crate::error::RestResult;

/// The static landing page and the name of its email form field
#[derive(Debug, Clone)]
pub struct LandingPage {
    path: PathBuf,
    email_form_key: String,
}

impl LandingPage {
    pub fn new(path: PathBuf, email_form_key: String) -> Self {
        Self {
            path,
            email_form_key,
        }
    }

    pub fn email_form_key(&self) -> &str {
        &self.email_form_key
    }

    /// Read the page from disk, so edits show up without a restart
    pub async fn render(&self) -> RestResult<HttpResponse> {
        let body = tokio::fs::read(&self.path).await?;
        Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body))
    }
}

#[tracing::instrument(name = "Show landing page", skip(page))]
pub async fn show(page: web::Data<LandingPage>) -> RestResult<HttpResponse> {
    page.render().await
}
