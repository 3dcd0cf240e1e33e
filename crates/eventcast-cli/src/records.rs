//! Demonstration record types.

use eventcast_schema::TypedRecord;
use serde::Serialize;

/// Sample order record, matching the Order schema registered in the
/// demo group.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: String,
    pub amount: f64,
    pub description: String,
}

impl TypedRecord for Order {
    fn definition() -> &'static str {
        r#"{
            "type": "record",
            "name": "Order",
            "fields": [
                {"name": "id", "type": "string"},
                {"name": "amount", "type": "double"},
                {"name": "description", "type": "string"}
            ]
        }"#
    }
}

/// Record whose schema is deliberately never registered, used to
/// demonstrate the serialization failure path.
#[derive(Debug, Clone, Serialize)]
pub struct BadOrder {
    pub foo: String,
}

impl TypedRecord for BadOrder {
    fn definition() -> &'static str {
        r#"{
            "type": "record",
            "name": "BadOrder",
            "fields": [
                {"name": "foo", "type": "string"}
            ]
        }"#
    }
}
