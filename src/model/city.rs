use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::binder::{Bindable, FieldKind, FieldSpec, FieldValue};
use crate::model::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: Id,
    pub name: String,
    pub active: bool,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating or replacing a city.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityDto {
    pub name: String,
    pub active: bool,
}

const CITY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", FieldKind::Text),
    FieldSpec::new("active", FieldKind::Flag),
];

impl Bindable for CityDto {
    fn fields() -> &'static [FieldSpec] {
        CITY_FIELDS
    }

    fn assign(&mut self, index: usize, value: FieldValue) {
        match (index, value) {
            (0, FieldValue::Text(name)) => self.name = name,
            (1, FieldValue::Flag(active)) => self.active = active,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn city_serializes_with_created_and_updated_keys() {
        let city = City {
            id: 7,
            name: "Bogotá".to_string(),
            active: true,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        };

        let json = serde_json::to_value(&city).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Bogotá");
        assert_eq!(json["active"], true);
        assert_eq!(json["created"], "2024-01-01T00:00:00Z");
        assert!(json["updated"].is_null());
        assert!(json.get("created_at").is_none());
    }
}
