//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod health;
mod posts;


use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                .route("/posts", web::get().to(posts::list_published))
                .route("/posts/{id}", web::get().to(posts::get_published))
                // Author routes
                .service(
                    web::scope("/me/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(posts::list_own))
                                .route(web::post().to(posts::create)),
                        )
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(posts::get_own))
                                .route(web::put().to(posts::edit))
                                .route(web::delete().to(posts::delete)),
                        ),
                )
                // Admin routes; `bulk` must be registered before `{id}`
                .service(
                    web::scope("/admin")
                        .route("/posts", web::get().to(admin::list_posts))
                        .service(
                            web::resource("/posts/bulk")
                                .route(web::patch().to(admin::bulk_set_status))
                                .route(web::delete().to(admin::bulk_delete)),
                        )
                        .service(
                            web::resource("/posts/{id}")
                                .route(web::get().to(admin::get_post))
                                .route(web::patch().to(admin::set_status))
                                .route(web::delete().to(admin::delete_post)),
                        )
                        .route("/analytics", web::get().to(admin::analytics))
                        .route("/users", web::post().to(auth::register_admin)),
                ),
        );
}

/// Malformed JSON bodies become 400 problem documents.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::BadRequest("Invalid post id".to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
