//! # Concurrency Integration
//!
//! Shared-state races across the full stack: the connection singleton, the
//! batch map, and the audit log all take concurrent callers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::Stage;

    use crate::integration::fixtures::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_batch_invokes_one_collection_record() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let gateway = Arc::clone(&gateway);
            let species = if i % 2 == 0 { "Ashwagandha" } else { "Tulsi" };
            handles.push(tokio::spawn(async move {
                let payload =
                    serde_json::json!({"species": species, "weight": 2500.0}).to_string();
                gateway
                    .invoke("RecordCollectionEvent", &[payload], Some("HERB005"))
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Every submission committed and was logged, but the projection
        // recorded exactly one collection sub-record.
        assert_eq!(gateway.log().len(), 8);
        let batch = gateway.projector().get_batch("HERB005").unwrap();
        assert_eq!(batch.completed_steps, vec![Stage::Collection]);
        let species = batch.collection.unwrap().species;
        assert!(species == "Ashwagandha" || species == "Tulsi");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_distinct_batches_proceed_independently() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move {
                let batch_id = format!("HERB{:03}", i);
                let payload = collection_payload(&batch_id);
                gateway
                    .invoke("RecordCollectionEvent", &[payload], Some(&batch_id))
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(gateway.projector().active_count(), 16);
        assert_eq!(gateway.log().len(), 16);

        // Each committed transaction got its own ledger block.
        let mut blocks: Vec<u64> = gateway
            .log()
            .recent(16)
            .iter()
            .map(|r| r.block.number())
            .collect();
        blocks.sort_unstable();
        blocks.dedup();
        assert_eq!(blocks.len(), 16);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_audit_and_projection_stay_consistent_under_load() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        let mut submitters = Vec::new();
        for i in 0..8 {
            let gateway = Arc::clone(&gateway);
            submitters.push(tokio::spawn(async move {
                let batch_id = format!("HERB{:03}", i);
                gateway
                    .invoke(
                        "RecordCollectionEvent",
                        &[collection_payload(&batch_id)],
                        Some(&batch_id),
                    )
                    .await
            }));
        }

        let mut succeeded = 0;
        for handle in submitters {
            if handle.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }

        // Every successful invoke left exactly one audit record and one
        // projected batch; no half-recorded outcomes.
        assert_eq!(succeeded, 8);
        assert_eq!(gateway.log().len(), succeeded);
        assert_eq!(gateway.projector().active_count(), succeeded);
    }

    #[tokio::test]
    async fn test_probe_never_touches_batch_state() {
        let (ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB060")],
                Some("HERB060"),
            )
            .await
            .unwrap();

        let handle = gateway.spawn_probe();
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert!(gateway.health().reachable);

        ledger.set_reachable(false);
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;

        // Whatever the probe observed, the projection is untouched.
        let batch = gateway.projector().get_batch("HERB060").unwrap();
        assert_eq!(batch.completed_steps, vec![Stage::Collection]);
        handle.abort();
    }
}
