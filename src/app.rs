use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{quotes, status, users},
    Data,
};

pub fn build_router(data: Data) -> Router {
    Router::new()
        .route("/health", get(status::healthcheck))
        .route("/api/status", get(status::status))
        .route("/api/users", post(users::create_user).get(users::list_users))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/quotes",
            post(quotes::create_quote).get(quotes::list_quotes),
        )
        .route("/api/quotes/batch", post(quotes::create_quotes_batch))
        .route(
            "/api/quotes/category/{category}",
            get(quotes::list_quotes_by_category),
        )
        .route(
            "/api/quotes/{id}",
            get(quotes::get_quote)
                .put(quotes::update_quote)
                .delete(quotes::delete_quote),
        )
        .route(
            "/api/quotes/{id}/favorite",
            post(quotes::add_favorite).delete(quotes::remove_favorite),
        )
        .route("/api/favorites", get(quotes::list_favorites))
        .route("/api/categories", get(quotes::list_categories))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(data)
}
