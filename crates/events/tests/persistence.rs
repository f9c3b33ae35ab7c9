//! Integration test: every published event ends up in the audit trail.

use std::time::Duration;

use momentum_events::{AppEvent, EventBus, EventPersistence};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn published_events_land_in_audit_logs(pool: PgPool) {
    let bus = EventBus::default();
    let handle = tokio::spawn(EventPersistence::run(pool.clone(), bus.subscribe()));

    bus.publish(
        AppEvent::new("board.updated")
            .with_source("board", 17)
            .with_payload(serde_json::json!({ "change": "step_added" })),
    );

    // The subscriber persists asynchronously; poll briefly.
    let mut rows = 0i64;
    for _ in 0..50 {
        rows = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE action = 'board.updated'")
            .fetch_one(&pool)
            .await
            .unwrap();
        if rows > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(rows, 1, "event must be written to audit_logs");

    let (entity_type, entity_id, details): (Option<String>, Option<i64>, serde_json::Value) =
        sqlx::query_as(
            "SELECT entity_type, entity_id, details FROM audit_logs \
             WHERE action = 'board.updated'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(entity_type.as_deref(), Some("board"));
    assert_eq!(entity_id, Some(17));
    assert_eq!(details["change"], "step_added");

    // Dropping the bus closes the channel and ends the loop.
    drop(bus);
    let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
}
