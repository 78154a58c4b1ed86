//! HTTP handlers and route configuration.

mod comments;
mod health;
mod live;
mod media;
mod posts;

#[cfg(test)]
mod tests;

use actix_multipart::form::MultipartFormConfig;
use actix_web::{HttpRequest, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
///
/// Extractor failures (malformed JSON, unparseable query values) are
/// rewritten into the same RFC 7807 body every other error uses, so the
/// API never answers with a non-JSON error.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(60 * 1024 * 1024)
                    .memory_limit(4 * 1024 * 1024),
            )
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Blog posts
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::get_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("", web::put().to(posts::update_post))
                    .route("", web::delete().to(posts::delete_post))
                    .route("/read", web::post().to(posts::record_read)),
            )
            // Comments
            .service(
                web::scope("/comments")
                    .route("", web::get().to(comments::list_comments))
                    .route("", web::post().to(comments::create_comment))
                    .route("", web::delete().to(comments::delete_comment)),
            )
            // Media
            .route("/upload", web::post().to(media::upload))
            .route("/media/{id}", web::patch().to(media::attach))
            // Live comment stream
            .service(
                web::scope("/live")
                    .route("", web::get().to(live::latest))
                    .route("", web::post().to(live::publish))
                    .route("", web::delete().to(live::clear)),
            ),
    );
}

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}
