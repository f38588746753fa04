//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Health check
//!
//! # Catalog
//! GET    /api/products             - Browse (?category=&sort=)
//! GET    /api/products/{id}        - Product detail
//! GET    /api/categories           - Filter bar: categories and sort options
//!
//! # Cart (stored in the session)
//! GET    /api/cart                 - Entries, count and total
//! POST   /api/cart                 - Add a product
//! DELETE /api/cart                 - Clear
//! DELETE /api/cart/{product_id}    - Remove every entry for a product
//!
//! # Session and auth
//! GET    /api/session              - Current session view
//! POST   /api/auth/login           - Login (rate limited)
//! POST   /api/auth/signup          - Signup (rate limited)
//! POST   /api/auth/logout          - Logout
//!
//! # Account (requires auth)
//! POST   /api/account              - Update account settings
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{auth_rate_limiter, create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add).delete(cart::clear))
        .route("/{product_id}", delete(cart::remove))
}

/// Create the auth routes router.
///
/// Login and signup sit behind the rate limiter when `rate_limit` is set.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let credentials = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup));

    let credentials = if rate_limit {
        credentials.layer(auth_rate_limiter())
    } else {
        credentials
    };

    credentials.route("/logout", post(auth::logout))
}

/// Create all API routes for the storefront.
pub fn routes(state: &AppState) -> Router<AppState> {
    let api = Router::new()
        .merge(product_routes())
        .nest("/cart", cart_routes())
        .route("/session", get(auth::session))
        .nest("/auth", auth_routes(state.config().auth_rate_limit))
        .route(
            "/account",
            post(account::update).layer(DefaultBodyLimit::max(account::MAX_BODY_BYTES)),
        );

    Router::new().nest("/api", api)
}

/// Build the complete application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes(&state))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::StorefrontConfig;
    use crate::db::{MemoryUserStore, seed_demo_users};
    use crate::services::auth::CredentialScheme;
    use crate::state::AppState;

    /// An in-process client that carries the session cookie between requests.
    pub(crate) struct TestClient {
        app: Router,
        cookie: Option<String>,
        pub(crate) users: MemoryUserStore,
    }

    impl TestClient {
        /// App over the embedded catalog and an in-memory store holding the
        /// demo users.
        pub(crate) async fn new() -> Self {
            let config = StorefrontConfig {
                auth_rate_limit: false,
                ..StorefrontConfig::default()
            };
            let users = MemoryUserStore::new();
            seed_demo_users(&users, CredentialScheme::Argon2).await.unwrap();

            let catalog = crate::catalog::embedded().unwrap();
            let state = AppState::new(config, catalog, Arc::new(users.clone()));

            Self {
                app: super::app(state),
                cookie: None,
                users,
            }
        }

        /// Another client of the same app, starting without a session.
        pub(crate) fn fresh_session(&self) -> Self {
            Self {
                app: self.app.clone(),
                cookie: None,
                users: self.users.clone(),
            }
        }

        pub(crate) async fn send(
            &mut self,
            method: Method,
            uri: &str,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(cookie) = &self.cookie {
                request = request.header(header::COOKIE, cookie);
            }
            let request = match body {
                Some(json) => request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string())),
                None => request.body(Body::empty()),
            }
            .unwrap();

            let response = self.app.clone().oneshot(request).await.unwrap();

            if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
                let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
                self.cookie = Some(pair.to_owned());
            }

            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            };
            (status, json)
        }

        pub(crate) async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
            self.send(Method::GET, uri, None).await
        }

        pub(crate) async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
            self.send(Method::POST, uri, Some(body)).await
        }

        pub(crate) async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
            self.send(Method::DELETE, uri, None).await
        }
    }
}
