use axum::{Router, routing::get};

use super::controller::{
    create_lecturer, delete_lecturer, get_lecturer, get_lecturers, update_lecturer,
};
use crate::state::AppState;

pub fn init_lecturers_router() -> Router<AppState> {
    Router::new()
        .route("/lecturers", get(get_lecturers).post(create_lecturer))
        .route(
            "/lecturer/{id}",
            get(get_lecturer)
                .put(update_lecturer)
                .delete(delete_lecturer),
        )
}
