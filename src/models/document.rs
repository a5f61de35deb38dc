//! Raw documents as held by the document store

use std::cmp::Ordering;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// Field map of a stored document (the id is kept outside)
pub type DocumentData = Map<String, Value>;

/// A document keyed by an opaque identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: DocumentData,
}

impl Document {
    pub fn new(id: impl Into<String>, data: DocumentData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }

    /// Decode into a typed entity, injecting the document id as `id`
    pub fn to_entity<T: DeserializeOwned>(&self) -> AppResult<T> {
        let mut data = self.data.clone();
        data.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

/// Encode an entity or input struct into document fields, dropping any `id`
pub fn to_document_data<T: Serialize>(value: &T) -> AppResult<DocumentData> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => Err(AppError::Internal(format!(
            "Expected an object, got {}",
            other
        ))),
    }
}

/// Sort direction of a collection query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC NULLS FIRST",
            Direction::Desc => "DESC NULLS LAST",
        }
    }
}

/// A whole collection ordered by one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub collection: String,
    pub order_by: String,
    pub direction: Direction,
}

impl CollectionQuery {
    pub fn new(collection: impl Into<String>, order_by: impl Into<String>, direction: Direction) -> Self {
        Self {
            collection: collection.into(),
            order_by: order_by.into(),
            direction,
        }
    }

    /// Compare two documents on the ordering field, ties broken by id
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ord = compare_values(a.field(&self.order_by), b.field(&self.order_by));
        let ord = match self.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        };
        ord.then_with(|| a.id.cmp(&b.id))
    }
}

/// Kind of change a document went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// Raw write notification published by a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEvent {
    pub collection: String,
    pub id: String,
    pub kind: ChangeKind,
}

/// One document change inside a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub kind: ChangeKind,
    pub document: Document,
}

/// Full ordered result set plus the changes since the previous snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub documents: Vec<Document>,
    pub changes: Vec<DocumentChange>,
}

// Same ranking as jsonb: null < string < number < boolean < array < object.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Order two optional JSON values; a missing field sorts like `null`
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ if type_rank(a) == type_rank(b) => a.to_string().cmp(&b.to_string()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, value: Value) -> Document {
        match value {
            Value::Object(map) => Document::new(id, map),
            _ => panic!("object expected"),
        }
    }

    #[test]
    fn test_compare_strings_and_missing() {
        let q = CollectionQuery::new("vendors", "vendorName", Direction::Asc);
        let a = doc("1", json!({ "vendorName": "Acme" }));
        let b = doc("2", json!({ "vendorName": "Bolt" }));
        let missing = doc("3", json!({}));
        assert_eq!(q.compare(&a, &b), Ordering::Less);
        assert_eq!(q.compare(&missing, &a), Ordering::Less);

        let q = CollectionQuery::new("vendors", "vendorName", Direction::Desc);
        assert_eq!(q.compare(&a, &b), Ordering::Greater);
        assert_eq!(q.compare(&missing, &a), Ordering::Greater);
    }

    #[test]
    fn test_compare_numbers() {
        assert_eq!(
            compare_values(Some(&json!(2)), Some(&json!(10))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!("10")), Some(&json!(2))),
            Ordering::Less
        );
    }

    #[test]
    fn test_entity_roundtrip_keeps_id_outside_data() {
        #[derive(Serialize, Deserialize)]
        struct Thing {
            id: String,
            name: String,
        }

        let data = to_document_data(&Thing {
            id: "ignored".into(),
            name: "Washer".into(),
        })
        .unwrap();
        assert!(!data.contains_key("id"));

        let thing: Thing = Document::new("abc", data).to_entity().unwrap();
        assert_eq!(thing.id, "abc");
        assert_eq!(thing.name, "Washer");
    }
}
