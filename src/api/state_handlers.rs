use axum::{
    body::Bytes,
    extract::{Path, State as AxumState},
    http::StatusCode,
};

use crate::api::auth::BearerToken;
use crate::api::handlers::{parse_id, respond, ApiResult, AppState};
use crate::error::ApiError;
use crate::logic::validate_state;
use crate::messages;
use crate::model::State;
use crate::store::traits::Store;

pub async fn list_states<S: Store>(
    _auth: BearerToken,
    AxumState(store): AxumState<AppState<S>>,
) -> ApiResult<Vec<State>> {
    let states = store.list_states().await.map_err(ApiError::Query)?;
    respond(StatusCode::OK, states, None)
}

pub async fn get_state<S: Store>(
    _auth: BearerToken,
    AxumState(store): AxumState<AppState<S>>,
    Path(raw_id): Path<String>,
) -> ApiResult<State> {
    let id = parse_id(&raw_id)?;
    match store.get_state(id).await.map_err(ApiError::Query)? {
        Some(state) => respond(StatusCode::OK, state, None),
        None => Err(ApiError::NotFound),
    }
}

/// States belonging to a city; an unknown city yields an empty list.
pub async fn list_states_by_city<S: Store>(
    _auth: BearerToken,
    AxumState(store): AxumState<AppState<S>>,
    Path(raw_city_id): Path<String>,
) -> ApiResult<Vec<State>> {
    let city_id = parse_id(&raw_city_id)?;
    let states = store
        .list_states_by_city(city_id)
        .await
        .map_err(ApiError::Query)?;
    respond(StatusCode::OK, states, None)
}

pub async fn create_state<S: Store>(
    _auth: BearerToken,
    AxumState(store): AxumState<AppState<S>>,
    body: Bytes,
) -> ApiResult<State> {
    let state = validate_state(&*store, 0, &body).await?;

    let created = store.create_state(state).await.map_err(ApiError::Create)?;
    log::info!(
        "created state {} '{}' in city {}",
        created.id,
        created.name,
        created.city_id
    );
    respond(StatusCode::CREATED, created, Some(messages::CREATED))
}

pub async fn update_state<S: Store>(
    _auth: BearerToken,
    AxumState(store): AxumState<AppState<S>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<State> {
    let id = parse_id(&raw_id)?;
    let state = validate_state(&*store, id, &body).await?;

    if store.get_state(id).await.map_err(ApiError::Update)?.is_none() {
        return Err(ApiError::NotFound);
    }

    match store.update_state(id, state).await.map_err(ApiError::Update)? {
        Some(updated) => {
            log::info!("updated state {}", updated.id);
            respond(StatusCode::OK, updated, Some(messages::UPDATED))
        }
        None => Err(ApiError::NotFound),
    }
}

pub async fn delete_state<S: Store>(
    _auth: BearerToken,
    AxumState(store): AxumState<AppState<S>>,
    Path(raw_id): Path<String>,
) -> ApiResult<bool> {
    let id = parse_id(&raw_id)?;
    if store.get_state(id).await.map_err(ApiError::Delete)?.is_none() {
        return Err(ApiError::NotFound);
    }

    let removed = store.delete_state(id).await.map_err(ApiError::Delete)?;
    log::info!("removed state {id}");
    respond(StatusCode::OK, removed, Some(messages::REMOVED))
}
