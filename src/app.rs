use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Builds the full router: public routes, token-protected routes and global layers.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", post(public::login))
        .route("/users", post(public::register))
        // Protected
        .merge(catalog_routes(state.clone()))
        .merge(user_routes(state.clone()))
        // Global middleware, outermost first
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn catalog_routes(state: AppState) -> Router<AppState> {
    use protected::{directors, dramas, genres};

    Router::new()
        .route("/korean-dramas", get(dramas::list))
        .route("/korean-dramas/:title", get(dramas::get))
        .route("/genres", get(genres::list))
        .route("/genres/:name", get(genres::get))
        .route("/directors/:name", get(directors::get))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn user_routes(state: AppState) -> Router<AppState> {
    use protected::{favorites, users};

    Router::new()
        .route(
            "/users/:username",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/users/:username/favs", get(favorites::list))
        .route(
            "/users/:username/favs/:drama_id",
            post(favorites::add).delete(favorites::remove),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// Cross-origin access is limited to the configured origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
