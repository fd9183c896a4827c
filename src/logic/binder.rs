//! Binds an untyped JSON object onto a typed request DTO.
//!
//! Each DTO publishes a static field table. Keys are resolved to a field index
//! through a process-wide cache; keys that match no field are skipped, values
//! that cannot be converted to the field's kind abort the bind.

use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

use crate::model::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
    Unsigned,
}

impl FieldKind {
    fn describe(self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Flag => "boolean",
            FieldKind::Unsigned => "unsigned integer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(key: &'static str, kind: FieldKind) -> Self {
        Self { key, kind }
    }
}

/// A converted value, ready to be stored in the field it was resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Unsigned(Id),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("error assigning field '{field}': cannot convert {value} to {expected}")]
    Mismatch {
        field: String,
        value: String,
        expected: &'static str,
    },
}

/// Longest rendering of an offending value echoed back in a [`BindError`].
const MAX_ECHOED_CHARS: usize = 40;

fn echo(value: &Value) -> String {
    let rendered = value.to_string();
    match rendered.char_indices().nth(MAX_ECHOED_CHARS) {
        Some((cut, _)) => format!("{}...", &rendered[..cut]),
        None => rendered,
    }
}

/// A DTO that can be filled from a JSON object.
pub trait Bindable: Default + 'static {
    fn fields() -> &'static [FieldSpec];

    /// Store `value` in the field at `index` of [`Bindable::fields`].
    fn assign(&mut self, index: usize, value: FieldValue);
}

type FieldCache = RwLock<HashMap<(&'static str, String), usize>>;

fn field_cache() -> &'static FieldCache {
    static CACHE: OnceLock<FieldCache> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolve `key` to an index into `T::fields()`, caching hits.
pub(crate) fn field_index<T: Bindable>(key: &str) -> Option<usize> {
    let type_name = std::any::type_name::<T>();
    let cache_key = (type_name, key.to_string());

    if let Some(index) = field_cache().read().get(&cache_key) {
        return Some(*index);
    }

    let index = T::fields().iter().position(|field| field.key == key)?;
    field_cache().write().insert(cache_key, index);
    Some(index)
}

/// Fill `target` from `map`. Fields absent from the map, or present as `null`,
/// keep their current value.
pub fn bind<T: Bindable>(map: &Map<String, Value>, target: &mut T) -> Result<(), BindError> {
    for (key, value) in map {
        let Some(index) = field_index::<T>(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let spec = T::fields()[index];
        let converted = convert(value, spec.kind).ok_or_else(|| BindError::Mismatch {
            field: key.clone(),
            value: echo(value),
            expected: spec.kind.describe(),
        })?;
        target.assign(index, converted);
    }

    Ok(())
}

/// Convenience wrapper returning a freshly bound `T`.
pub fn bind_new<T: Bindable>(map: &Map<String, Value>) -> Result<T, BindError> {
    let mut target = T::default();
    bind(map, &mut target)?;
    Ok(target)
}

fn convert(value: &Value, kind: FieldKind) -> Option<FieldValue> {
    match (kind, value) {
        (FieldKind::Text, Value::String(text)) => Some(FieldValue::Text(text.clone())),
        (FieldKind::Flag, Value::Bool(flag)) => Some(FieldValue::Flag(*flag)),
        (FieldKind::Unsigned, Value::Number(number)) => {
            if let Some(whole) = number.as_u64() {
                return Id::try_from(whole).ok().map(FieldValue::Unsigned);
            }
            // Integral floats such as `3.0` are accepted.
            let float = number.as_f64()?;
            if float.fract() == 0.0 && float >= 0.0 && float <= Id::MAX as f64 {
                Some(FieldValue::Unsigned(float as Id))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CityDto, StateDto};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn binds_known_fields_and_skips_unknown_ones() {
        let map = object(json!({
            "name": "Chapinero",
            "zip_code": "110231",
            "city_id": 3,
            "active": true,
            "population": 12000,
            "id": 99
        }));

        let dto: StateDto = bind_new(&map).unwrap();
        assert_eq!(
            dto,
            StateDto {
                name: "Chapinero".to_string(),
                zip_code: "110231".to_string(),
                city_id: 3,
                active: true,
            }
        );
    }

    #[test]
    fn null_and_missing_values_keep_defaults() {
        let map = object(json!({ "name": null, "active": true }));
        let dto: CityDto = bind_new(&map).unwrap();
        assert_eq!(dto.name, "");
        assert!(dto.active);
    }

    #[test]
    fn integral_floats_convert_to_unsigned() {
        let map = object(json!({ "city_id": 4.0 }));
        let dto: StateDto = bind_new(&map).unwrap();
        assert_eq!(dto.city_id, 4);
    }

    #[test]
    fn rejects_values_that_do_not_convert() {
        let cases = [
            json!({ "city_id": -1 }),
            json!({ "city_id": 2.5 }),
            json!({ "city_id": "3" }),
            json!({ "city_id": 4_294_967_296u64 }),
            json!({ "active": "yes" }),
            json!({ "name": 12 }),
            json!({ "zip_code": ["110231"] }),
        ];

        for case in cases {
            let map = object(case.clone());
            let result: Result<StateDto, _> = bind_new(&map);
            assert!(
                matches!(result, Err(BindError::Mismatch { .. })),
                "expected mismatch for {case}"
            );
        }
    }

    #[test]
    fn mismatch_message_names_field_and_kind() {
        let map = object(json!({ "active": "yes" }));
        let err = bind_new::<CityDto>(&map).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error assigning field 'active': cannot convert \"yes\" to boolean"
        );
    }

    #[test]
    fn mismatch_message_truncates_large_values() {
        let map = object(json!({ "name": vec![7u32; 500] }));
        let err = bind_new::<CityDto>(&map).unwrap_err();
        let BindError::Mismatch { value, .. } = &err;
        assert_eq!(value.chars().count(), MAX_ECHOED_CHARS + 3);
        assert!(value.starts_with("[7,7,7"));
        assert!(value.ends_with("..."));
        assert!(err.to_string().len() < 120);
    }

    #[test]
    fn field_index_is_cached_per_type() {
        assert_eq!(field_index::<StateDto>("active"), Some(3));
        assert_eq!(field_index::<CityDto>("active"), Some(1));
        assert_eq!(field_index::<CityDto>("zip_code"), None);

        let cache = field_cache().read();
        assert_eq!(
            cache.get(&(std::any::type_name::<StateDto>(), "active".to_string())),
            Some(&3)
        );
        assert!(!cache.contains_key(&(std::any::type_name::<CityDto>(), "zip_code".to_string())));
    }
}
