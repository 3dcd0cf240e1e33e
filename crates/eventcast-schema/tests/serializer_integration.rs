//! Integration tests for schema resolution and event serialization.
//!
//! Everything here runs against the in-memory registry. Tests marked
//! `#[ignore]` expect a live registry at http://localhost:8081.

use std::sync::Arc;

use apache_avro::types::Value;
use serde::Serialize;

use eventcast_schema::{
    DynamicRecord, EventSerializer, MemorySchemaRegistry, RestSchemaRegistry, SchemaError,
    SchemaFormat, SchemaRegistry, TypedRecord,
};

const ORDER_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Order",
    "fields": [
        {"name": "id", "type": "string"},
        {"name": "amount", "type": "double"},
        {"name": "description", "type": "string"}
    ]
}"#;

#[derive(Debug, Serialize)]
struct Order {
    id: String,
    amount: f64,
    description: String,
}

impl TypedRecord for Order {
    fn definition() -> &'static str {
        ORDER_SCHEMA
    }
}

fn build_serializer(registry: &Arc<MemorySchemaRegistry>, auto_register: bool) -> EventSerializer {
    EventSerializer::builder()
        .registry(Arc::clone(registry) as Arc<dyn SchemaRegistry>)
        .group("orders-group")
        .auto_register(auto_register)
        .build()
        .unwrap()
}

async fn seed_order(registry: &MemorySchemaRegistry) -> i32 {
    registry
        .register_schema("orders-group", "Order", ORDER_SCHEMA, SchemaFormat::Avro)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_typed_order_round_trips_through_registry() {
    let registry = Arc::new(MemorySchemaRegistry::new());
    let id = seed_order(&registry).await;
    let serializer = build_serializer(&registry, false);

    let order = Order {
        id: "1234".to_string(),
        amount: 45.29,
        description: "First sample order.".to_string(),
    };

    let event = serializer.serialize(&order).await.unwrap();
    assert_eq!(event.schema_id, id);
    assert_eq!(event.content_type, format!("avro/binary+{}", id));

    let (schema_id, value) = serializer.deserialize(&event.payload).await.unwrap();
    assert_eq!(schema_id, id);

    let Value::Record(fields) = value else {
        panic!("expected a record value");
    };
    assert_eq!(fields[0], ("id".to_string(), Value::String("1234".to_string())));
    assert_eq!(fields[1], ("amount".to_string(), Value::Double(45.29)));
    assert_eq!(
        fields[2],
        (
            "description".to_string(),
            Value::String("First sample order.".to_string())
        )
    );
}

#[tokio::test]
async fn test_dynamic_order_uses_schema_fetched_by_id() {
    let registry = Arc::new(MemorySchemaRegistry::new());
    let id = seed_order(&registry).await;
    let serializer = build_serializer(&registry, false);

    let fetched = registry
        .get_schema_by_id(id)
        .await
        .unwrap()
        .expect("seeded schema should exist");

    let mut record = DynamicRecord::from_definition(&fetched.definition).unwrap();
    record.set("id", "my-new-id").unwrap();
    record.set("amount", 100.50).unwrap();
    record.set("description", "my-new-description").unwrap();

    let event = serializer.serialize_dynamic(&record).await.unwrap();
    assert_eq!(event.schema_id, id);

    let (_, value) = serializer.deserialize(&event.payload).await.unwrap();
    let Value::Record(fields) = value else {
        panic!("expected a record value");
    };
    assert!(fields.contains(&("id".to_string(), Value::String("my-new-id".to_string()))));
    assert!(fields.contains(&("amount".to_string(), Value::Double(100.50))));
}

#[tokio::test]
async fn test_unregistered_record_fails_resolution() {
    #[derive(Debug, Serialize)]
    struct BadOrder {
        foo: String,
    }

    impl TypedRecord for BadOrder {
        fn definition() -> &'static str {
            r#"{"type": "record", "name": "BadOrder", "fields": [{"name": "foo", "type": "string"}]}"#
        }
    }

    let registry = Arc::new(MemorySchemaRegistry::new());
    seed_order(&registry).await;
    let serializer = build_serializer(&registry, false);

    let err = serializer
        .serialize(&BadOrder {
            foo: "bar".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        SchemaError::SchemaNotFound { group, name } => {
            assert_eq!(group, "orders-group");
            assert_eq!(name, "BadOrder");
        }
        other => panic!("expected SchemaNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_changed_definition_resolves_to_new_id() {
    let registry = Arc::new(MemorySchemaRegistry::new());
    let first_id = seed_order(&registry).await;
    let serializer = build_serializer(&registry, true);

    let widened = r#"{
        "type": "record",
        "name": "Order",
        "fields": [
            {"name": "id", "type": "string"},
            {"name": "amount", "type": "double"},
            {"name": "description", "type": "string"},
            {"name": "currency", "type": "string", "default": "USD"}
        ]
    }"#;

    let mut record = DynamicRecord::from_definition(widened).unwrap();
    record.set("id", "evolved").unwrap();
    record.set("amount", 1.0).unwrap();
    record.set("description", "widened order").unwrap();
    record.set("currency", "EUR").unwrap();

    let event = serializer.serialize_dynamic(&record).await.unwrap();
    assert_ne!(event.schema_id, first_id);
    assert_eq!(event.content_type, format!("avro/binary+{}", event.schema_id));

    let latest = registry
        .get_schema("orders-group", "Order")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.version, 2);
    assert_eq!(latest.id, event.schema_id);
}

// ============================================================================
// Live registry tests
// ============================================================================

#[tokio::test]
#[ignore] // Requires a running schema registry at localhost:8081
async fn test_live_registry_register_and_fetch() {
    let registry = RestSchemaRegistry::new("http://localhost:8081");

    let id = registry
        .register_schema("orders-group", "Order", ORDER_SCHEMA, SchemaFormat::Avro)
        .await
        .unwrap();

    let fetched = registry.get_schema_by_id(id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Order");
    assert_eq!(fetched.format, SchemaFormat::Avro);
}

#[tokio::test]
#[ignore] // Requires a running schema registry at localhost:8081
async fn test_live_registry_serializes_typed_order() {
    let registry: Arc<dyn SchemaRegistry> = Arc::new(RestSchemaRegistry::new(
        "http://localhost:8081",
    ));
    let serializer = EventSerializer::builder()
        .registry(registry)
        .group("orders-group")
        .auto_register(true)
        .build()
        .unwrap();

    let event = serializer
        .serialize(&Order {
            id: "live-1".to_string(),
            amount: 12.34,
            description: "live test order".to_string(),
        })
        .await
        .unwrap();

    assert!(event.schema_id > 0);
}
