use std::time::Duration;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{admin, protected, public};
use crate::middleware::{admin_auth_middleware, jwt_auth_middleware, TOKEN_HEADER};
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.api.request_timeout_secs);
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(public::health))
        .merge(public_routes())
        .nest("/api/v1/admin", admin_routes(&state))
        .nest("/api/v1", protected_routes(&state))
        .with_state(state);

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(timeout)),
    )
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth", post(public::authenticate))
        .route("/api/register", post(public::register))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Users
        .route("/user/me", get(protected::me))
        .route("/user/:id", get(protected::get_user))
        // Hotels
        .route("/hotel", get(protected::list_hotels))
        .route("/hotel/:id", get(protected::get_hotel))
        .route("/hotel/:id/rooms", get(protected::get_hotel_rooms))
        // Rooms
        .route("/room", get(protected::list_rooms))
        .route("/room/:id/book", post(protected::book_room))
        // Bookings
        .route("/booking/:id", get(protected::get_booking))
        .route("/booking/:id/cancel", get(protected::cancel_booking))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    // Layers run outermost-last: the token is validated before the admin flag is checked
    Router::new()
        .route("/booking", get(admin::list_bookings))
        .route("/user", get(admin::list_users))
        .route("/hotel", post(admin::create_hotel))
        .route("/hotel/:id/room", post(admin::create_room))
        .route_layer(middleware::from_fn(admin_auth_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static("x-api-token"),
        ]);

    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(layer.allow_origin(AllowOrigin::list(origins)))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Hotel Reservation API",
        "version": version,
        "token_header": TOKEN_HEADER,
        "endpoints": {
            "health": "/health (public)",
            "auth": "/api/auth, /api/register (public - token acquisition)",
            "users": "/api/v1/user/me, /api/v1/user/:id (protected)",
            "hotels": "/api/v1/hotel[/:id[/rooms]] (protected)",
            "rooms": "/api/v1/room[/:id/book] (protected)",
            "bookings": "/api/v1/booking/:id[/cancel] (protected, owner only)",
            "admin": "/api/v1/admin/{booking,user,hotel,hotel/:id/room} (admin only)",
        }
    }))
}

/// Bind on `0.0.0.0:port` and serve until `shutdown` resolves.
pub async fn serve(
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", state.config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Hotel reservation API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
