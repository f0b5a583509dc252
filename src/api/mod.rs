//! API handlers for Bookshelf REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::{AppError, AppResult}, models::claims::BookClaims, AppState};

/// Extractor for the caller's claims from the JWT bearer token
pub struct AuthenticatedUser(pub BookClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = BookClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Gate in front of every books route: the caller needs at least read rights.
///
/// Rejected requests never reach the handler.
pub async fn require_read_access(
    user: Result<AuthenticatedUser, AppError>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let AuthenticatedUser(claims) = user.map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "Rejected unauthenticated request: {}", e);
        e
    })?;

    if let Err(e) = claims.require_read_books() {
        tracing::warn!(sub = %claims.sub, path = %request.uri().path(), "Rejected request: {}", e);
        return Err(e);
    }

    tracing::debug!(sub = %claims.sub, "Access granted");
    Ok(next.run(request).await)
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let books = Router::new()
        .route("/", get(books::list_books).post(books::create_book))
        .route("/:id", get(books::get_book))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_read_access));

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .nest("/books", books)
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
