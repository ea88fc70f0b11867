//! Serialization for Record as a flat JSON object.
//!
//! Fields serialize in name order so that views and exports are stable
//! across runs. On the way in, JSON scalars become typed [`Value`]s through
//! [`Value::from_json`].

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::Record;
use super::Value;

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sorted = self.sorted_fields();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (key, value) in sorted {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field names to values")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Record, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut fields = HashMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            let json: serde_json::Value = map.next_value()?;
            fields.insert(key, Value::from_json(json));
        }
        Ok(Record { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowKey;
    use crate::model::TableRow;

    #[test]
    fn test_serialize_sorted_fields() {
        let record = Record::new()
            .set("salary", 100)
            .set("dept", "Eng")
            .set("active", true);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"active":true,"dept":"Eng","salary":100}"#);
    }

    #[test]
    fn test_deserialize_typed_values() {
        let json = r#"{
            "id": "12345678-1234-1234-1234-123456789012",
            "name": "Ada",
            "salary": 120000,
            "hired": "2021-04-01T09:00:00Z",
            "tags": ["a", "b"]
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert!(matches!(record.get("id"), Some(Value::Guid(_))));
        assert_eq!(record.get("name"), Some(&Value::String("Ada".to_string())));
        assert_eq!(record.get("salary"), Some(&Value::Int(120_000)));
        assert!(matches!(record.get("hired"), Some(Value::DateTime(_))));
        assert_eq!(record.get("tags").map(Value::type_name), Some("list"));
    }

    #[test]
    fn test_key_prefers_id() {
        let a = Record::new().set("id", 7).set("name", "Ada");
        let b = Record::new().set("id", 7).set("name", "Grace");
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), RowKey::Id("7".to_string()));
    }

    #[test]
    fn test_key_falls_back_to_structure() {
        let a = Record::new().set("name", "Ada").set("age", 36);
        let b = Record::new().set("age", 36).set("name", "Ada");
        let c = Record::new().set("name", "Ada").set("age", 37);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());

        let null_id = Record::new().set("id", Value::Null).set("name", "Ada");
        assert!(matches!(null_id.key(), RowKey::Structural(_)));
    }
}
