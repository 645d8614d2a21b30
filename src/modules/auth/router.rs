use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    confirm_reset_code, current_user, generate_reset_code, get_csrf, login, logout,
    reset_password, update_user,
};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/csrf", get(get_csrf))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(current_user))
        .route("/update", post(update_user))
        .route("/generate-reset-code", post(generate_reset_code))
        .route("/confirm-reset-code", post(confirm_reset_code))
        .route("/reset-password", post(reset_password))
}
