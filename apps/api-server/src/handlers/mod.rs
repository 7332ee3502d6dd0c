//! HTTP handlers and route configuration.

mod form;
mod health;
mod llm;
mod login;
mod profile;
mod recognition;
mod token;
mod users;


use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};

use nutrivision_core::ports::RateLimiter;
use nutrivision_shared::ErrorResponse;

use crate::config::MAX_BODY_BYTES;
use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::observability::RequestId;

/// Configure all application routes.
///
/// `login_limiter` throttles `POST /api/login` per client address.
pub fn configure_routes(cfg: &mut web::ServiceConfig, login_limiter: Arc<dyn RateLimiter>) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // Users
            .route("/register", web::post().to(users::create_user))
            .service(
                web::resource("/users")
                    .route(web::post().to(users::create_user))
                    .route(web::get().to(users::get_current_user))
                    .route(web::delete().to(users::delete_all_users)),
            )
            .service(
                web::resource("/users/{id}")
                    .route(web::put().to(users::update_user))
                    .route(web::delete().to(users::delete_user)),
            )
            // Session
            .service(
                web::resource("/login")
                    .wrap(RateLimitMiddleware::new(login_limiter))
                    .route(web::post().to(login::login)),
            )
            .route("/login/logout", web::post().to(login::logout))
            .route("/token/validate", web::post().to(token::validate))
            .route("/token/refresh", web::post().to(token::refresh))
            // Profile and upstream proxies
            .route("/profile", web::post().to(profile::update_profile))
            .route("/recognition", web::post().to(recognition::recognize))
            .route("/llm/chat", web::post().to(llm::chat))
            .route("/llm/chat_history", web::get().to(llm::chat_history))
            .route("/llm/chat_one/{chat_id}", web::get().to(llm::chat_one)),
    )
    .default_service(web::route().to(unknown_endpoint));
}

async fn unknown_endpoint(req: HttpRequest) -> HttpResponse {
    let mut body = ErrorResponse::not_found("unknown endpoint");
    if let Some(id) = req.extensions().get::<RequestId>() {
        body = body.with_request_id(id.as_str());
    }
    HttpResponse::NotFound().json(body)
}
