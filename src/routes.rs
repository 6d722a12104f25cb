// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, flashcards, quiz},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, flashcards, quiz).
/// * Protects everything but register/login/check with the JWT middleware.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:5500"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/check", get(auth::check_auth))
        .merge(
            Router::new()
                .route("/logout", post(auth::logout))
                .layer(auth_layer.clone()),
        );

    let flashcard_routes = Router::new()
        .route("/generate", post(flashcards::generate_flashcards))
        .route("/save", post(flashcards::save_flashcards))
        .route("/saved", get(flashcards::list_saved))
        .layer(auth_layer.clone());

    let quiz_routes = Router::new()
        .route("/", get(quiz::current_quiz).delete(quiz::abort_quiz))
        .route("/start", post(quiz::start_quiz))
        .route("/reveal", post(quiz::show_answer))
        .route("/grade", post(quiz::grade_answer))
        .route("/results", get(quiz::quiz_results))
        .route("/retake", post(quiz::retake_quiz))
        .layer(auth_layer);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/flashcards", flashcard_routes)
        .nest("/api/quiz", quiz_routes)
        // Global Middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
