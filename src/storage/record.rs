use chrono::{Datelike, NaiveDateTime, SubsecRound, Timelike, Utc};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::metadata::{CoercionError, Kind, Value};
use super::StorageError;

/// Field carrying the record kind in the persisted document.
pub const CLASS_FIELD: &str = "__class__";
/// Timestamp layout used in the persisted document.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

const PARSE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub kind: Kind,
    pub id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub attributes: BTreeMap<String, Value>,
}

impl Record {
    /// Fresh record with a random id. Timestamps keep microsecond precision
    /// so a save/reload cycle gives back the same values.
    pub fn new(kind: Kind) -> Self {
        let now = Utc::now().naive_utc().trunc_subsecs(6);
        Self {
            kind,
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            attributes: BTreeMap::new(),
        }
    }

    /// Composite store key, `<Kind>.<id>`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.kind, self.id)
    }

    /// Refreshes the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().naive_utc().trunc_subsecs(6);
    }

    /// Rebuilds a record from its serialized mapping. The kind comes from
    /// the `__class__` marker, everything else is assigned as found.
    pub fn from_map(map: &Map<String, JsonValue>) -> Result<Self, StorageError> {
        let class_name = map.get(CLASS_FIELD)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| StorageError::MalformedRecord(format!("missing {}", CLASS_FIELD)))?;
        let kind = Kind::from_name(class_name)
            .ok_or_else(|| StorageError::MalformedRecord(format!("unknown class {}", class_name)))?;

        let id = map.get("id")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| StorageError::MalformedRecord("missing id".to_string()))?
            .to_string();
        let created_at = Self::timestamp_field(map, "created_at")?;
        let updated_at = Self::timestamp_field(map, "updated_at")?;

        let mut attributes = BTreeMap::new();
        for (name, raw) in map {
            if matches!(name.as_str(), "id" | "created_at" | "updated_at" | CLASS_FIELD) {
                continue;
            }
            match Value::from_json(raw) {
                Some(value) => {
                    attributes.insert(name.clone(), value);
                }
                None => tracing::warn!(record = %id, attribute = %name, "skipping unsupported attribute value"),
            }
        }

        Ok(Self { kind, id, created_at, updated_at, attributes })
    }

    fn timestamp_field(map: &Map<String, JsonValue>, field: &str) -> Result<NaiveDateTime, StorageError> {
        map.get(field)
            .and_then(JsonValue::as_str)
            .and_then(parse_timestamp)
            .ok_or_else(|| StorageError::MalformedRecord(format!("missing or invalid {}", field)))
    }

    pub fn to_map(&self) -> Result<Map<String, JsonValue>, StorageError> {
        let mut map = Map::new();
        map.insert("id".to_string(), JsonValue::String(self.id.clone()));
        map.insert("created_at".to_string(), JsonValue::String(format_timestamp(&self.created_at)));
        map.insert("updated_at".to_string(), JsonValue::String(format_timestamp(&self.updated_at)));
        for (name, value) in &self.attributes {
            map.insert(name.clone(), serde_json::to_value(value)?);
        }
        map.insert(CLASS_FIELD.to_string(), JsonValue::String(self.kind.name().to_string()));
        Ok(map)
    }

    /// Instance value, falling back to the kind's class-level default.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name)
            .cloned()
            .or_else(|| self.kind.default_attribute(name))
    }

    /// Assigns raw text to an attribute. An attribute that already exists
    /// keeps its type; a new one is stored as a string. `id`, the
    /// timestamps and `__class__` are writable too.
    pub fn update_attribute(&mut self, name: &str, raw: &str) -> Result<(), CoercionError> {
        let mismatch = |expected| CoercionError { raw: raw.to_string(), expected };

        match name {
            "id" => self.id = raw.to_string(),
            "created_at" => self.created_at = parse_timestamp(raw).ok_or_else(|| mismatch("timestamp"))?,
            "updated_at" => self.updated_at = parse_timestamp(raw).ok_or_else(|| mismatch("timestamp"))?,
            CLASS_FIELD => self.kind = Kind::from_name(raw).ok_or_else(|| mismatch("class name"))?,
            _ => {
                let value = match self.attribute(name) {
                    Some(existing) => existing.coerce_like(raw)?,
                    None => Value::String(raw.to_string()),
                };
                self.attributes.insert(name.to_string(), value);
            }
        }
        Ok(())
    }
}

/// `[<Kind>] (<id>) {<attributes>}` with the attributes as a Python dict.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {{'id': {}, 'created_at': {}, 'updated_at': {}",
            self.kind,
            self.id,
            Value::String(self.id.clone()),
            python_datetime(&self.created_at),
            python_datetime(&self.updated_at),
        )?;
        for (name, value) in &self.attributes {
            write!(f, ", {}: {}", Value::String(name.clone()), value)?;
        }
        f.write_str("}")
    }
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIME_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, PARSE_TIME_FORMAT).ok()
}

fn python_datetime(ts: &NaiveDateTime) -> String {
    let micros = ts.nanosecond() / 1_000;
    let mut fields = vec![
        ts.year().to_string(),
        ts.month().to_string(),
        ts.day().to_string(),
        ts.hour().to_string(),
        ts.minute().to_string(),
    ];
    // Trailing zero seconds/microseconds are omitted.
    if micros != 0 {
        fields.push(ts.second().to_string());
        fields.push(micros.to_string());
    } else if ts.second() != 0 {
        fields.push(ts.second().to_string());
    }
    format!("datetime.datetime({})", fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_time() -> NaiveDateTime {
        parse_timestamp("2017-09-28T21:05:54.119427").unwrap()
    }

    #[test]
    fn test_new_record_has_uuid_and_equal_timestamps() {
        let record = Record::new(Kind::User);
        assert!(Uuid::parse_str(&record.id).is_ok());
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.key(), format!("User.{}", record.id));
        assert!(record.attributes.is_empty());
    }

    #[test]
    fn test_map_round_trip_keeps_kind_and_values() {
        let mut record = Record::new(Kind::Place);
        record.update_attribute("number_rooms", "4").unwrap();
        record.update_attribute("name", "Loft").unwrap();
        record.update_attribute("latitude", "37.77").unwrap();

        let map = record.to_map().unwrap();
        assert_eq!(map[CLASS_FIELD], "Place");
        assert_eq!(map["number_rooms"], 4);

        let restored = Record::from_map(&map).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_from_map_rejects_unknown_class() {
        let mut map = Record::new(Kind::City).to_map().unwrap();
        map.insert(CLASS_FIELD.to_string(), JsonValue::String("Country".to_string()));
        assert!(matches!(Record::from_map(&map), Err(StorageError::MalformedRecord(_))));

        map.remove(CLASS_FIELD);
        assert!(Record::from_map(&map).is_err());
    }

    #[test]
    fn test_defaults_are_visible_but_not_listed() {
        let record = Record::new(Kind::City);
        assert_eq!(record.attribute("state_id"), Some(Value::String(String::new())));
        assert!(!record.to_map().unwrap().contains_key("state_id"));
        assert!(!record.to_string().contains("state_id"));
    }

    #[test]
    fn test_update_coerces_to_existing_type() {
        let mut record = Record::new(Kind::Place);
        record.update_attribute("max_guest", "10").unwrap();
        assert_eq!(record.attributes["max_guest"], Value::Integer(10));

        record.update_attribute("nickname", "42").unwrap();
        assert_eq!(record.attributes["nickname"], Value::String("42".to_string()));

        let err = record.update_attribute("max_guest", "many").unwrap_err();
        assert_eq!(err.expected, "integer");
        assert_eq!(record.attributes["max_guest"], Value::Integer(10));
    }

    #[test]
    fn test_update_reaches_identity_fields() {
        let mut record = Record::new(Kind::User);
        record.update_attribute("id", "abc").unwrap();
        record.update_attribute(CLASS_FIELD, "State").unwrap();
        assert_eq!(record.key(), "State.abc");
        assert!(record.update_attribute(CLASS_FIELD, "Nope").is_err());
        assert!(record.update_attribute("created_at", "yesterday").is_err());
    }

    #[test]
    fn test_display_string() {
        let mut record = Record::new(Kind::User);
        record.id = "id1".to_string();
        record.created_at = fixed_time();
        record.updated_at = parse_timestamp("2017-09-28T21:05:00.000000").unwrap();
        record.update_attribute("name", "Betty").unwrap();

        assert_eq!(
            record.to_string(),
            "[User] (id1) {'id': 'id1', \
             'created_at': datetime.datetime(2017, 9, 28, 21, 5, 54, 119427), \
             'updated_at': datetime.datetime(2017, 9, 28, 21, 5), 'name': 'Betty'}"
        );
    }

    #[test]
    fn test_display_lists_attributes_by_name() {
        let mut record = Record::new(Kind::BaseModel);
        record.update_attribute("zeta", "z").unwrap();
        record.update_attribute("alpha", "a").unwrap();
        record.update_attribute("latitude", "1").unwrap();

        let display = record.to_string();
        let alpha = display.find("'alpha'").unwrap();
        let latitude = display.find("'latitude'").unwrap();
        let zeta = display.find("'zeta'").unwrap();
        assert!(display.find("'updated_at'").unwrap() < alpha);
        assert!(alpha < latitude && latitude < zeta);
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(&fixed_time()), "2017-09-28T21:05:54.119427");
        assert_eq!(parse_timestamp("2017-09-28T21:05:54"), parse_timestamp("2017-09-28T21:05:54.000000"));
    }
}
