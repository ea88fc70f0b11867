//! Dynamic grid record

use std::collections::BTreeMap;
use std::collections::HashMap;

use super::RowKey;
use super::TableRow;
use super::Value;

/// Name of the field that carries a record's identity.
pub const ID_FIELD: &str = "id";

/// A dynamic record supplied by the host application.
///
/// Records hold field values as a `HashMap<String, Value>`, allowing dynamic
/// access to any field. The grid never mutates a record in place: edits are
/// handed to the host, which supplies replacement records.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Record, Value};
///
/// let record = Record::new()
///     .set("id", 1)
///     .set("dept", "Eng")
///     .set("salary", 100);
///
/// assert_eq!(record.get("dept"), Some(&Value::from("Eng")));
/// assert_eq!(record.get("salary").and_then(Value::to_number), Some(100.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// The field values.
    pub(crate) fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from `(field, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the explicit identity value, ignoring a null `id`.
    pub fn id(&self) -> Option<&Value> {
        self.fields.get(ID_FIELD).filter(|v| !v.is_null())
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns a copy of this record with one field replaced.
    ///
    /// This is how cell edits produce replacement records.
    pub fn with_field(&self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.fields.insert(field.into(), value.into());
        next
    }

    /// Returns the fields sorted by name.
    pub(crate) fn sorted_fields(&self) -> BTreeMap<&str, &Value> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }
}

impl TableRow for Record {
    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn key(&self) -> RowKey {
        match self.id() {
            Some(id) => RowKey::Id(serde_json::to_string(id).unwrap_or_else(|_| id.to_string())),
            None => RowKey::Structural(
                serde_json::to_string(&self.sorted_fields()).unwrap_or_default(),
            ),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
