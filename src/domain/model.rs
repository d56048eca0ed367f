use crate::utils::error::{CrmError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Customer row as stored by the backend. Geography fields are free text and
/// may be missing or disagree with each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub notes: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CustomerRecord {
    /// Builds a record from one schemaless row. Only non-object rows are
    /// rejected; odd field types are coerced instead.
    pub fn from_row(row: usize, value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| CrmError::InvalidRecordError {
            row,
            reason: format!("expected a JSON object, got {}", json_kind(value)),
        })?;

        Ok(Self {
            id: coerce_string(obj, "id").unwrap_or_default(),
            name: coerce_string(obj, "name"),
            email: coerce_string(obj, "email"),
            phone: coerce_string(obj, "phone"),
            city: coerce_string(obj, "city"),
            province: coerce_string(obj, "province"),
            notes: coerce_string(obj, "notes"),
            latitude: coerce_f64(obj, "latitude"),
            longitude: coerce_f64(obj, "longitude"),
            created_at: coerce_timestamp(obj, "created_at"),
        })
    }

    pub fn from_rows(rows: &[Value]) -> Result<Vec<Self>> {
        rows.iter()
            .enumerate()
            .map(|(row, value)| Self::from_row(row, value))
            .collect()
    }

    /// Trimmed `city`, empty when unset.
    pub fn raw_city(&self) -> &str {
        self.city.as_deref().map(str::trim).unwrap_or("")
    }

    /// Valid coordinates, if both are present and in range.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng))
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) =>
            {
                Some((lat, lng))
            }
            _ => None,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn coerce_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => {
            tracing::debug!("Ignoring {} value for field '{}'", json_kind(other), key);
            None
        }
    }
}

fn coerce_f64(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_timestamp(obj: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let raw = obj.get(key)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
}

/// Provinces the CRM recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Province {
    Huelva,
    Cadiz,
    Ceuta,
}

impl Province {
    pub const ALL: [Province; 3] = [Province::Huelva, Province::Cadiz, Province::Ceuta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Province::Huelva => "Huelva",
            Province::Cadiz => "Cádiz",
            Province::Ceuta => "Ceuta",
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Province {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Display name of an optional province, `""` when unresolved.
pub fn province_name(province: Option<Province>) -> &'static str {
    province.map(|p| p.as_str()).unwrap_or("")
}

fn serialize_province<S: Serializer>(
    province: &Option<Province>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(province_name(*province))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGeography {
    #[serde(serialize_with = "serialize_province")]
    pub canonical_province: Option<Province>,
    pub display_city: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCustomer {
    #[serde(flatten)]
    pub record: CustomerRecord,
    pub geography: ResolvedGeography,
}

/// Province/city selection coming from the UI or a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoQuery {
    pub province: Option<String>,
    pub city: Option<String>,
}

impl GeoQuery {
    pub fn new(province: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            province: Some(province.into()),
            city: Some(city.into()),
        }
    }

    /// Selected province, `None` when empty or blank.
    pub fn province(&self) -> Option<&str> {
        non_blank(self.province.as_deref())
    }

    /// Selected city, `None` when empty or blank.
    pub fn city(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.province().is_none() && self.city().is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_row_coerces_field_types() {
        let row = json!({
            "id": 42,
            "name": "Bodega Sánchez",
            "city": null,
            "province": 7,
            "notes": ["not", "text"],
            "latitude": "37.26",
            "longitude": -6.94,
            "created_at": "2024-03-01T10:00:00Z"
        });

        let record = CustomerRecord::from_row(0, &row).unwrap();

        assert_eq!(record.id, "42");
        assert_eq!(record.name.as_deref(), Some("Bodega Sánchez"));
        assert_eq!(record.city, None);
        assert_eq!(record.province.as_deref(), Some("7"));
        assert_eq!(record.notes, None);
        assert_eq!(record.latitude, Some(37.26));
        assert_eq!(record.longitude, Some(-6.94));
        assert!(record.created_at.is_some());
        assert_eq!(record.email, None);
    }

    #[test]
    fn test_from_rows_rejects_non_object_rows() {
        let rows = vec![json!({"id": "a"}), json!("oops")];
        let err = CustomerRecord::from_rows(&rows).unwrap_err();
        assert!(matches!(err, CrmError::InvalidRecordError { row: 1, .. }));
    }

    #[test]
    fn test_coordinates_out_of_range_are_ignored() {
        let record = CustomerRecord {
            latitude: Some(137.0),
            longitude: Some(-6.0),
            ..Default::default()
        };
        assert_eq!(record.coordinates(), None);

        let record = CustomerRecord {
            latitude: Some(36.5),
            longitude: Some(-6.2),
            ..Default::default()
        };
        assert_eq!(record.coordinates(), Some((36.5, -6.2)));
    }

    #[test]
    fn test_resolved_geography_serializes_empty_province() {
        let geo = ResolvedGeography {
            canonical_province: None,
            display_city: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&geo).unwrap(),
            json!({"canonicalProvince": "", "displayCity": ""})
        );

        let geo = ResolvedGeography {
            canonical_province: Some(Province::Cadiz),
            display_city: "Jerez".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&geo).unwrap(),
            json!({"canonicalProvince": "Cádiz", "displayCity": "Jerez"})
        );
    }

    #[test]
    fn test_blank_query_values_are_unconstrained() {
        let query = GeoQuery::new("  ", "");
        assert!(query.is_unconstrained());
        assert_eq!(GeoQuery::new(" Huelva ", "").province(), Some("Huelva"));
    }
}
