use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One element of the input dataset, keyed by source column name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }
}

/// A transformed record, ready to be sent as one entry of `Rows`.
///
/// Every target column of the mapping is present. A `None` value means the
/// source column was missing; it is left out of the serialized object, while
/// an explicit JSON `null` is sent as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Option<serde_json::Value>)>,
}

impl Row {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: Option<serde_json::Value>) {
        self.fields.push((column.into(), value));
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    /// The value copied into `column`, or `None` when the column is unknown
    /// or its source field was absent.
    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self.fields.iter().filter(|(_, v)| v.is_some()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for (column, value) in &self.fields {
            if let Some(value) = value {
                map.serialize_entry(column, value)?;
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rows: Vec<Row>,
}

/// Request body for the AppSheet table `Action` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRequest {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Properties")]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "Rows")]
    pub rows: Vec<Row>,
}

impl ActionRequest {
    /// An `Add` action carrying at most `batch_size` rows, in order.
    /// Rows beyond the limit are dropped.
    pub fn add(mut rows: Vec<Row>, batch_size: usize) -> Self {
        rows.truncate(batch_size);
        Self {
            action: "Add".to_string(),
            properties: serde_json::Map::new(),
            rows,
        }
    }
}

/// Terminal state of the upload step.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The endpoint answered with a success status.
    Responded { status: u16 },
    /// Transport error or rejected status. Carries the rendered error.
    Failed { error: String },
    /// Dry run: the body was written to `path` instead of being sent.
    Skipped { path: String },
}

impl UploadOutcome {
    pub fn is_responded(&self) -> bool {
        matches!(self, UploadOutcome::Responded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_skips_absent_values_but_keeps_null() {
        let mut row = Row::default();
        row.push("segmento", Some(json!("A")));
        row.push("nombre", None);
        row.push("ean", Some(serde_json::Value::Null));

        assert!(row.contains_key("nombre"));
        assert_eq!(row.get("nombre"), None);

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value, json!({"segmento": "A", "ean": null}));
    }

    #[test]
    fn test_action_request_shape() {
        let request = ActionRequest::add(vec![Row::default(), Row::default()], 1);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["Action"], "Add");
        assert_eq!(body["Properties"], json!({}));
        assert_eq!(body["Rows"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_rows_serialize_as_empty_array() {
        let request = ActionRequest::add(Vec::new(), 1000);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["Rows"], json!([]));
    }
}
