use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error, trace};

use crate::services::ShortLinkService;
use crate::utils::is_valid_short_code;

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        short_links: web::Data<Arc<ShortLinkService>>,
    ) -> impl Responder {
        let code = path.into_inner();

        if !is_valid_short_code(&code) {
            trace!("Invalid short code rejected: {}", &code);
            return Self::not_found_response();
        }

        match short_links.resolve(&code).await {
            Ok(Some(full_url)) => {
                debug!("Redirecting {} -> {}", code, full_url);
                HttpResponse::Found()
                    .insert_header(("Location", full_url))
                    .finish()
            }
            Ok(None) => {
                debug!("Short link not found or inactive: {}", code);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Database error during redirect lookup: {}", e);
                Self::error_response()
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Not Found")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Internal Server Error")
    }
}

/// 短链接跳转路由 `/s/{code}` 与 `/s/{code}/`
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("/s")
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
        .route("/{code}/", web::get().to(RedirectService::handle_redirect))
        .route("/{code}/", web::head().to(RedirectService::handle_redirect))
}
