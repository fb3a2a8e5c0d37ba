use axum::Router;

use crate::{AppState, controllers::status_controller};

pub mod events_routes;
pub mod status_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = status_routes::add_routes(router);
    let router = events_routes::add_routes(router);

    router
        .fallback(status_controller::not_found)
        .with_state(state)
}
