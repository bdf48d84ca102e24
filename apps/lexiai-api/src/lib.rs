//! LexiAI API - legal document analysis backend
//!
//! Provides REST endpoints for:
//! - Account signup/login with bearer tokens and cookie sessions
//! - Document upload, AI analysis, clause breakdown and PDF reports
//! - Chat with an assistant about an uploaded document
//! - Legal glossary, dashboard statistics and UI translation

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use extract_core::MAX_UPLOAD_BYTES;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{Args, Config};
pub use error::ApiError;
pub use state::AppState;

/// Room for the multipart envelope and the title field around the file
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Build the application router
///
/// Rate limiting is applied by the binary, since it needs the peer address.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Auth
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/user", get(handlers::auth::current_user))
        // Documents
        .route(
            "/api/documents/upload",
            post(handlers::documents::upload_document)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD)),
        )
        .route("/api/documents", get(handlers::documents::list_documents))
        .route("/api/documents/:id", get(handlers::documents::get_document))
        .route("/api/documents/:id/download", get(handlers::documents::download_document))
        .route("/api/documents/:id/report", get(handlers::documents::download_report))
        // Chat
        .route(
            "/api/chat/conversations",
            get(handlers::chat::list_conversations).post(handlers::chat::create_conversation),
        )
        .route(
            "/api/chat/conversations/:id/messages",
            get(handlers::chat::list_messages).post(handlers::chat::send_message),
        )
        // Reference data
        .route("/api/glossary", get(handlers::glossary::list_terms))
        .route("/api/glossary/:term", get(handlers::glossary::get_term))
        .route("/api/dashboard/stats", get(handlers::dashboard::stats))
        .route("/api/languages", get(handlers::languages::list_languages))
        .route("/api/translate-ui", post(handlers::languages::translate_ui))
        // Middleware
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
