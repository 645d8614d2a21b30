use axum::{Router, routing::get};

use super::controller::{
    create_nomination, delete_nomination, get_nomination, get_nominations, get_workload,
    update_nomination,
};
use crate::state::AppState;

pub fn init_nominations_router() -> Router<AppState> {
    Router::new()
        .route("/nominations", get(get_nominations).post(create_nomination))
        .route("/nominations/workload", get(get_workload))
        .route(
            "/nomination/{id}",
            get(get_nomination)
                .put(update_nomination)
                .delete(delete_nomination),
        )
}
