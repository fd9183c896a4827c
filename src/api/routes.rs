use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::{city_handlers, handlers, state_handlers};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes::<S>())
}

fn api_routes<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Cities
        .route(
            "/cities",
            get(city_handlers::list_cities::<S>).post(city_handlers::create_city::<S>),
        )
        .route(
            "/cities/:id",
            get(city_handlers::get_city::<S>)
                .put(city_handlers::update_city::<S>)
                .delete(city_handlers::delete_city::<S>),
        )
        // States
        .route(
            "/states",
            get(state_handlers::list_states::<S>).post(state_handlers::create_state::<S>),
        )
        .route(
            "/states/:id",
            get(state_handlers::get_state::<S>)
                .put(state_handlers::update_state::<S>)
                .delete(state_handlers::delete_state::<S>),
        )
        .route(
            "/states/city/:id",
            get(state_handlers::list_states_by_city::<S>),
        )
}
