use axum::{Router, routing::get};
use crate::{AppState, controllers::status_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/health", get(status_controller::health))
        .route("/coins", get(status_controller::get_coins))
        .route("/coins/:id", get(status_controller::get_coin))
}
