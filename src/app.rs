use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{config, SecurityConfig};
use crate::handlers;
use crate::middleware::{require_auth, require_roles};
use crate::state::AppState;
use crate::types::roles;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let settings = config();

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        .with_state(state)
        // Global middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(settings.api.max_request_size_bytes))
        .layer(cors_layer(&settings.security));

    if settings.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/signin", post(auth::auth_signin))
        .route("/auth/signup", post(auth::auth_signup))
}

/// Everything under /api. Authentication wraps the whole group; role gates
/// are attached per method so one path can serve several roles.
fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{
        assignments, attendance, courses, departments, enrollments, messages, notices, session_me, session_refresh,
    };

    let student = || from_fn_with_state(roles::STUDENT, require_roles);
    let staff = || from_fn_with_state(roles::STAFF, require_roles);

    Router::new()
        // Session
        .route("/api/auth/me", get(session_me))
        .route("/api/auth/refresh", post(session_refresh))
        // Catalog
        .route("/api/departments", get(departments::list))
        .route("/api/courses", get(courses::list))
        .route("/api/courses/:id", get(courses::get))
        .route("/api/courses/:id/students", get(courses::students).route_layer(staff()))
        // Enrollment
        .route(
            "/api/courses/:id/enroll",
            post(enrollments::enroll).delete(enrollments::unenroll).route_layer(student()),
        )
        .route("/api/enrollments", get(enrollments::mine).route_layer(student()))
        // Coursework
        .route(
            "/api/courses/:id/assignments",
            get(assignments::list).merge(post(assignments::create).route_layer(staff())),
        )
        .route(
            "/api/assignments/:id/submissions",
            post(assignments::submit)
                .route_layer(student())
                .merge(get(assignments::submissions).route_layer(staff())),
        )
        // Attendance
        .route("/api/courses/:id/attendance", post(attendance::record).route_layer(staff()))
        .route("/api/attendance", get(attendance::mine).route_layer(student()))
        // Communication
        .route(
            "/api/notices",
            get(notices::list).merge(post(notices::create).route_layer(staff())),
        )
        .route("/api/notices/:id", delete(notices::delete).route_layer(staff()))
        .route("/api/messages", get(messages::inbox).post(messages::send))
        .route("/api/messages/:id/read", post(messages::mark_read))
        .nest("/api/admin", admin_routes())
        .route_layer(from_fn_with_state(state, require_auth))
}

fn admin_routes() -> Router<AppState> {
    use handlers::protected::{admin, courses, departments};

    Router::new()
        .route("/departments", post(departments::create))
        .route("/courses", post(courses::create))
        .route("/courses/:id/faculty", put(courses::assign_faculty))
        .route("/faculty", get(admin::faculty_list))
        .route("/faculty/:id/approve", post(admin::faculty_approve))
        .route("/faculty/:id/reject", post(admin::faculty_reject))
        .route_layer(from_fn_with_state(roles::ADMIN, require_roles))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Campus API",
            "version": version,
            "description": "Role-based academic management backend",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/auth/signin, /auth/signup (public - token acquisition)",
                "auth": "/api/auth/me, /api/auth/refresh (protected)",
                "catalog": "/api/departments, /api/courses[/:id] (protected)",
                "coursework": "/api/courses/:id/assignments, /api/assignments/:id/submissions (protected)",
                "attendance": "/api/courses/:id/attendance, /api/attendance (protected)",
                "communication": "/api/notices, /api/messages (protected)",
                "admin": "/api/admin/* (admin only)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
