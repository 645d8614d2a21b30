use axum::ServiceExt;
use axum::extract::Request;
use dotenvy::dotenv;
use fses::logging::init_tracing;
use fses::router::init_app;
use fses::state::init_app_state;
use fses_db::run_migrations;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let _guard = init_tracing();

    let state = init_app_state().await;

    if let Err(e) = run_migrations(&state.db).await {
        error!(error = %e, "Failed to apply migrations");
        std::process::exit(1);
    }

    let app = init_app(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    info!("Server running on http://localhost:{}", port);
    info!("Swagger UI available at http://localhost:{}/swagger-ui", port);
    info!("Scalar UI available at http://localhost:{}/scalar", port);

    if let Err(e) = axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await {
        error!(error = %e, "Server error");
    }
}
