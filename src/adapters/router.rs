use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    adapters::{controllers::file_controller::FileController, state::AppState},
    domain::{config::server::ServerConfig, models::file::UPLOADS_URL_PREFIX},
};

/// Room for multipart boundaries and part headers on top of the file bytes.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

fn body_limit(max_file_size: u64, max_files: usize) -> usize {
    let limit = max_file_size
        .saturating_mul(max_files as u64)
        .saturating_add(MULTIPART_OVERHEAD);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

pub fn create_router(app_state: AppState, config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/files",
            get(FileController::list_files).delete(FileController::delete_all_files),
        )
        .route("/api/files/{filename}", delete(FileController::delete_file))
        .route(
            "/api/upload",
            post(FileController::upload_file)
                .layer(DefaultBodyLimit::max(body_limit(config.max_file_size, 1))),
        )
        .route(
            "/api/upload-multiple",
            post(FileController::upload_files).layer(DefaultBodyLimit::max(body_limit(
                config.max_file_size,
                config.max_files,
            ))),
        )
        .with_state(app_state);

    api_routes
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(&config.upload_dir))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
