//! The data record threaded through a pipeline

use serde_json::{Map, Value};

/// The mapping-shaped payload every step consumes
pub type Record = Map<String, Value>;

/// Canonical field name used when a bare step output is promoted to a record
pub const WRAPPED_FIELD: &str = "data";

/// Promote a step output to a record.
///
/// Objects pass through untouched; anything else becomes `{"data": value}`
/// so the next step can always rely on receiving a record.
pub fn wrap(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        other => {
            let mut record = Map::new();
            record.insert(WRAPPED_FIELD.to_string(), other);
            record
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_output_passes_through() {
        let record = wrap(json!({ "data": 42, "tag": "x" }));
        assert_eq!(record.get("data"), Some(&json!(42)));
        assert_eq!(record.get("tag"), Some(&json!("x")));
    }

    #[test]
    fn test_bare_output_is_wrapped() {
        let record = wrap(json!(7));
        assert_eq!(record.len(), 1);
        assert_eq!(record.get(WRAPPED_FIELD), Some(&json!(7)));
    }
}
