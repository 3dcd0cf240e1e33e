//! The three demonstration publishing workflows.
//!
//! Each workflow builds one record, serializes it against the registry,
//! and publishes it in a single-event batch. The third one serializes a
//! record whose schema is never registered, so it fails before a batch
//! exists. Workflows never retry; a failure is reported once and the
//! process moves on.

use anyhow::{bail, Context, Result};
use tracing::info;

use eventcast_client::EventPublisher;
use eventcast_schema::{
    DynamicRecord, EventSerializer, SchemaError, SchemaFormat, SchemaRegistry, TypedRecord,
};

use crate::records::{BadOrder, Order};

/// Register the Order schema so the success workflows have something to
/// resolve against.
///
/// Registration is idempotent; an already-seeded registry returns the
/// existing id.
pub async fn seed_order_schema(registry: &dyn SchemaRegistry, group: &str) -> Result<i32> {
    let id = registry
        .register_schema(group, "Order", Order::definition(), SchemaFormat::Avro)
        .await
        .context("Failed to seed the Order schema")?;

    info!(schema_id = id, group = %group, "Order schema seeded");
    Ok(id)
}

/// Workflow 1: publish a well-formed typed Order record.
pub async fn publish_typed_order(
    serializer: &EventSerializer,
    publisher: &EventPublisher,
) -> Result<()> {
    let order = Order {
        id: "1234".to_string(),
        amount: 45.29,
        description: "First sample order.".to_string(),
    };

    let event = serializer
        .serialize(&order)
        .await
        .context("Failed to serialize the Order record")?;

    let mut batch = publisher.create_batch();
    if !batch.try_add(event) {
        bail!("Encoded order does not fit an empty batch");
    }
    publisher
        .send(batch)
        .await
        .context("Failed to publish the order batch")?;

    println!("✅ A batch of 1 order has been published using a typed Order record.");
    Ok(())
}

/// Workflow 2: fetch a schema by id and publish a record built against
/// it at runtime.
pub async fn publish_dynamic_order(
    registry: &dyn SchemaRegistry,
    serializer: &EventSerializer,
    publisher: &EventPublisher,
    schema_id: i32,
) -> Result<()> {
    let registered = registry
        .get_schema_by_id(schema_id)
        .await
        .context("Failed to fetch the target schema")?
        .ok_or(SchemaError::SchemaIdNotFound(schema_id))?;

    let mut record = DynamicRecord::from_definition(&registered.definition)?;
    record.set("id", "my-new-id")?;
    record.set("amount", 100.50)?;
    record.set("description", "my-new-description")?;

    let event = serializer
        .serialize_dynamic(&record)
        .await
        .context("Failed to serialize the dynamic record")?;

    let mut batch = publisher.create_batch();
    if !batch.try_add(event) {
        bail!("Encoded record does not fit an empty batch");
    }
    publisher
        .send(batch)
        .await
        .context("Failed to publish the dynamic batch")?;

    println!(
        "✅ A batch of 1 order has been published using a dynamic {} record built from schema id {}.",
        record.name(),
        schema_id
    );
    Ok(())
}

/// Workflow 3: serialize a record whose schema is not registered.
///
/// Schema resolution is designed to fail here, so no batch is created
/// and nothing reaches the stream. Any other failure is unexpected and
/// propagates.
pub async fn publish_unregistered_record(serializer: &EventSerializer) -> Result<()> {
    let bad = BadOrder {
        foo: "bar".to_string(),
    };

    match serializer.serialize(&bad).await {
        Err(e @ SchemaError::SchemaNotFound { .. }) => {
            println!(
                "✅ Serializing BadOrder was rejected before any batch was created: {}",
                e
            );
            Ok(())
        }
        Err(e) => Err(e).context("Unexpected failure serializing BadOrder"),
        Ok(_) => bail!("Serializing BadOrder unexpectedly succeeded; is its schema registered?"),
    }
}
