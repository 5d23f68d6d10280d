mod crud;
pub mod model;
pub mod store;
pub mod ws;

use axum::{Router, routing::get};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list_tours).post(crud::create_tour))
        .route(
            "/{id}",
            get(crud::get_tour).put(crud::update_tour).delete(crud::delete_tour),
        )
}
