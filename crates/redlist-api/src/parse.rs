//! JSON decoding into nested or flattened (tabular) records

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Result;

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Generic JSON structure, as returned by the API
    Nested(Value),
    /// Arrays of records materialized as tables
    Flat(FlatValue),
}

/// Flattened JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    /// Scalars, arrays of scalars, empty arrays, and anything else left as-is
    Scalar(Value),
    Object(FlatObject),
    Table(Table),
}

/// Object with field order preserved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatObject {
    fields: Vec<(String, FlatValue)>,
}

/// Columnar view of an array of records
///
/// Nested objects inside each record become dotted column names
/// (`taxon.scientific_name`). Cells missing from a record are `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Decode `body`, flattening arrays of records into tables when `flatten` is set
pub fn parse(body: &str, flatten: bool) -> Result<Parsed> {
    let value: Value = serde_json::from_str(body)?;
    if flatten {
        Ok(Parsed::Flat(flatten_value(value)))
    } else {
        Ok(Parsed::Nested(value))
    }
}

/// Flatten an already decoded value
pub fn flatten_value(value: Value) -> FlatValue {
    match value {
        Value::Object(map) => FlatValue::Object(FlatObject {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, flatten_value(v)))
                .collect(),
        }),
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            FlatValue::Table(Table::from_records(items))
        }
        other => FlatValue::Scalar(other),
    }
}

impl Parsed {
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat(_))
    }

    /// Number of entries held by the top-level `field` (rows or array items)
    pub fn record_count(&self, field: &str) -> usize {
        match self {
            Self::Nested(v) => v
                .get(field)
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0),
            Self::Flat(FlatValue::Object(obj)) => match obj.get(field) {
                Some(FlatValue::Table(t)) => t.rows.len(),
                Some(FlatValue::Scalar(Value::Array(a))) => a.len(),
                _ => 0,
            },
            Self::Flat(_) => 0,
        }
    }

    /// Convert to plain JSON; tables are emitted as `{columns, rows}`
    pub fn to_json(&self) -> Value {
        match self {
            Self::Nested(v) => v.clone(),
            Self::Flat(f) => serde_json::to_value(f).unwrap_or(Value::Null),
        }
    }
}

impl FlatObject {
    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Replace `key`'s value, appending the field if absent
    pub fn insert(&mut self, key: &str, value: FlatValue) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Table {
    /// Build a table from an array of JSON objects
    pub fn from_records(records: Vec<Value>) -> Self {
        let flat_rows: Vec<Vec<(String, Value)>> = records
            .into_iter()
            .map(|record| {
                let mut cells = Vec::new();
                if let Value::Object(map) = record {
                    flatten_record("", map, &mut cells);
                }
                cells
            })
            .collect();

        let mut columns: Vec<String> = Vec::new();
        for cells in &flat_rows {
            for (name, _) in cells {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }

        let rows = flat_rows
            .into_iter()
            .map(|mut cells| {
                columns
                    .iter()
                    .map(|col| match cells.iter().position(|(n, _)| n == col) {
                        Some(i) => cells.swap_remove(i).1,
                        None => Value::Null,
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Row-wise concatenation; columns are the union in first-seen order
    pub fn stack(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for col in &table.columns {
                if !columns.contains(col) {
                    columns.push(col.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for table in tables {
            let index: Vec<Option<usize>> = columns
                .iter()
                .map(|c| table.columns.iter().position(|tc| tc == c))
                .collect();
            for row in table.rows {
                rows.push(
                    index
                        .iter()
                        .map(|i| i.and_then(|i| row.get(i).cloned()).unwrap_or(Value::Null))
                        .collect(),
                );
            }
        }

        Table { columns, rows }
    }

    /// Cells of one column, if present
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let i = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| &r[i]).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn flatten_record(prefix: &str, map: Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_record(&name, inner, out),
            other => out.push((name, other)),
        }
    }
}

impl Serialize for FlatValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(v) => v.serialize(serializer),
            Self::Object(o) => o.serialize(serializer),
            Self::Table(t) => t.serialize(serializer),
        }
    }
}

impl Serialize for FlatObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for Parsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Nested(v) => v.serialize(serializer),
            Self::Flat(f) => f.serialize(serializer),
        }
    }
}
