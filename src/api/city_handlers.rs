use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::auth::BearerToken;
use crate::api::handlers::{parse_id, respond, ApiResult, AppState};
use crate::error::ApiError;
use crate::logic::validate_city;
use crate::messages;
use crate::model::City;
use crate::store::traits::Store;

pub async fn list_cities<S: Store>(
    _auth: BearerToken,
    State(store): State<AppState<S>>,
) -> ApiResult<Vec<City>> {
    let cities = store.list_cities().await.map_err(ApiError::Query)?;
    respond(StatusCode::OK, cities, None)
}

pub async fn get_city<S: Store>(
    _auth: BearerToken,
    State(store): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> ApiResult<City> {
    let id = parse_id(&raw_id)?;
    match store.get_city(id).await.map_err(ApiError::Query)? {
        Some(city) => respond(StatusCode::OK, city, None),
        None => Err(ApiError::NotFound),
    }
}

pub async fn create_city<S: Store>(
    _auth: BearerToken,
    State(store): State<AppState<S>>,
    body: Bytes,
) -> ApiResult<City> {
    let city = validate_city(&*store, 0, &body).await?;

    let created = store.create_city(city).await.map_err(ApiError::Create)?;
    log::info!("created city {} '{}'", created.id, created.name);
    respond(StatusCode::CREATED, created, Some(messages::CREATED))
}

pub async fn update_city<S: Store>(
    _auth: BearerToken,
    State(store): State<AppState<S>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<City> {
    let id = parse_id(&raw_id)?;
    let city = validate_city(&*store, id, &body).await?;

    if store.get_city(id).await.map_err(ApiError::Update)?.is_none() {
        return Err(ApiError::NotFound);
    }

    match store.update_city(id, city).await.map_err(ApiError::Update)? {
        Some(updated) => {
            log::info!("updated city {}", updated.id);
            respond(StatusCode::ACCEPTED, updated, Some(messages::UPDATED))
        }
        None => Err(ApiError::NotFound),
    }
}

pub async fn delete_city<S: Store>(
    _auth: BearerToken,
    State(store): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> ApiResult<bool> {
    let id = parse_id(&raw_id)?;
    if store.get_city(id).await.map_err(ApiError::Delete)?.is_none() {
        return Err(ApiError::NotFound);
    }

    let removed = store.delete_city(id).await.map_err(ApiError::Delete)?;
    log::info!("removed city {id}");
    respond(StatusCode::OK, removed, Some(messages::REMOVED))
}
