use serde_json::{Map, Value};

use crate::error::{ApiError, ValidationError};
use crate::logic::binder::bind_new;
use crate::messages;
use crate::model::{exceeds_text_column, CityDto, Id, StateDto};
use crate::store::traits::{CityStore, StateStore};

type JsonObject = Map<String, Value>;

/// Decode a request body that must be a JSON object.
pub fn parse_object(body: &[u8]) -> Result<JsonObject, ValidationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationError::MalformedBody(
            messages::BODY_NOT_OBJECT.to_string(),
        )),
        Err(err) => Err(ValidationError::MalformedBody(err.to_string())),
    }
}

fn is_missing(map: &JsonObject, key: &str) -> bool {
    map.get(key).map_or(true, Value::is_null)
}

fn is_blank(map: &JsonObject, key: &str) -> bool {
    match map.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

/// First failing rule wins; rules are listed highest priority first.
fn first_failure(rules: &[(bool, &'static str)]) -> Result<(), ValidationError> {
    match rules.iter().find(|(failed, _)| *failed) {
        Some((_, message)) => Err(ValidationError::Rule(*message)),
        None => Ok(()),
    }
}

pub fn check_city_fields(map: &JsonObject) -> Result<(), ValidationError> {
    first_failure(&[
        (is_missing(map, "active"), messages::ACTIVE_FIELD_IS_REQUIRED),
        (is_missing(map, "name"), messages::NAME_FIELD_IS_REQUIRED),
    ])
}

pub fn check_city_required(city: &CityDto) -> Result<(), ValidationError> {
    first_failure(&[
        (city.name.is_empty(), messages::NAME_IS_REQUIRED),
        (exceeds_text_column(&city.name), messages::NAME_TOO_LONG),
    ])
}

pub fn check_state_fields(map: &JsonObject) -> Result<(), ValidationError> {
    first_failure(&[
        (is_blank(map, "zip_code"), messages::ZIP_CODE_FIELD_IS_REQUIRED),
        (is_missing(map, "city_id"), messages::CITY_ID_FIELD_IS_REQUIRED),
        (is_missing(map, "active"), messages::ACTIVE_FIELD_IS_REQUIRED),
        (is_blank(map, "name"), messages::NAME_FIELD_IS_REQUIRED),
    ])
}

pub fn check_state_required(state: &StateDto) -> Result<(), ValidationError> {
    first_failure(&[
        (state.zip_code.is_empty(), messages::ZIP_CODE_IS_REQUIRED),
        (state.city_id == 0, messages::CITY_ID_IS_REQUIRED),
        (state.name.is_empty(), messages::NAME_IS_REQUIRED),
        (exceeds_text_column(&state.zip_code), messages::ZIP_CODE_TOO_LONG),
        (exceeds_text_column(&state.name), messages::NAME_TOO_LONG),
    ])
}

/// Parse, bind and validate a city payload. `id` is the row being updated, or
/// 0 when creating.
pub async fn validate_city<S: CityStore>(
    store: &S,
    id: Id,
    body: &[u8],
) -> Result<CityDto, ApiError> {
    let map = parse_object(body)?;
    check_city_fields(&map)?;

    let city: CityDto = bind_new(&map)?;
    check_city_required(&city)?;

    let taken = store
        .city_name_exists(id, &city.name)
        .await
        .map_err(ApiError::Query)?;
    if taken {
        return Err(ValidationError::Rule(messages::NAME_ALREADY_EXIST).into());
    }

    Ok(city)
}

/// Parse, bind and validate a state payload, including that its city exists.
pub async fn validate_state<S: CityStore + StateStore>(
    store: &S,
    id: Id,
    body: &[u8],
) -> Result<StateDto, ApiError> {
    let map = parse_object(body)?;
    check_state_fields(&map)?;

    let state: StateDto = bind_new(&map)?;
    check_state_required(&state)?;

    let city = store
        .get_city(state.city_id)
        .await
        .map_err(ApiError::Query)?;
    if city.is_none() {
        return Err(ValidationError::Rule(messages::CITY_NO_EXIST).into());
    }

    let taken = store
        .state_name_exists(id, &state.name)
        .await
        .map_err(ApiError::Query)?;
    if taken {
        return Err(ValidationError::Rule(messages::NAME_ALREADY_EXIST).into());
    }

    Ok(state)
}
