use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::binder::{Bindable, FieldKind, FieldSpec, FieldValue};
use crate::model::{City, Id};

/// A state row together with the city it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: Id,
    pub name: String,
    pub zip_code: String,
    pub city_id: Id,
    pub city: City,
    pub active: bool,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating or replacing a state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDto {
    pub name: String,
    pub zip_code: String,
    pub city_id: Id,
    pub active: bool,
}

const STATE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", FieldKind::Text),
    FieldSpec::new("zip_code", FieldKind::Text),
    FieldSpec::new("city_id", FieldKind::Unsigned),
    FieldSpec::new("active", FieldKind::Flag),
];

impl Bindable for StateDto {
    fn fields() -> &'static [FieldSpec] {
        STATE_FIELDS
    }

    fn assign(&mut self, index: usize, value: FieldValue) {
        match (index, value) {
            (0, FieldValue::Text(name)) => self.name = name,
            (1, FieldValue::Text(zip_code)) => self.zip_code = zip_code,
            (2, FieldValue::Unsigned(city_id)) => self.city_id = city_id,
            (3, FieldValue::Flag(active)) => self.active = active,
            _ => {}
        }
    }
}
