pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_cors::Cors;
use actix_web::web;

use crate::{auth::AuthMiddleware, error::AppError};

/// Registers every endpoint. `/users` and `/tasks` sit behind `AuthMiddleware`.
///
/// Body, form and query extraction failures answer 400 with the usual `{"detail"}` body.
/// The app is expected to wrap `NormalizePath::trim()` so `/tasks/` and `/tasks` match.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(health::root)
    .service(health::health)
    .service(auth::signup)
    .service(auth::login)
    .service(
        web::scope("/users")
            .wrap(AuthMiddleware)
            .service(users::me),
    )
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

/// CORS policy for the separately served frontend: any origin, method and header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
