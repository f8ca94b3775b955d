//! # Gateway Flow Integration
//!
//! End-to-end paths over a live (in-memory) ledger: submissions advance the
//! audit log and the batch projection synchronously, block numbers come
//! from actual ledger placement, and the projected sub-records reproduce
//! the submitted payloads field for field.

#[cfg(test)]
mod tests {
    use shared_types::{BlockRef, Origin, Stage};

    use crate::integration::fixtures::*;

    #[tokio::test]
    async fn test_full_custody_walk_to_terminal() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        let steps = [
            ("RecordCollectionEvent", collection_payload("HERB001")),
            ("QualityAttestation", quality_payload()),
            ("TransferCustody", processing_payload()),
            ("BatchCreation", manufacturing_payload()),
        ];

        for (i, (function, payload)) in steps.iter().enumerate() {
            let outcome = gateway
                .invoke(function, &[payload.clone()], Some("HERB001"))
                .await
                .unwrap();
            assert_eq!(outcome.origin, Origin::Real);
            assert_eq!(outcome.block, BlockRef::Resolved(i as u64 + 1));
        }

        let batch = gateway.projector().get_batch("HERB001").unwrap();
        assert_eq!(batch.completed_steps, Stage::ALL.to_vec());
        assert!(batch.is_terminal());
        assert!(ht_03_provenance::next_stage(&batch).is_none());
    }

    #[tokio::test]
    async fn test_two_stage_scenario_and_next_stage() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB001")],
                Some("HERB001"),
            )
            .await
            .unwrap();
        gateway
            .invoke("QualityAttestation", &[quality_payload()], Some("HERB001"))
            .await
            .unwrap();

        let batch = gateway.projector().get_batch("HERB001").unwrap();
        assert_eq!(
            batch.completed_steps,
            vec![Stage::Collection, Stage::Quality]
        );
        assert_eq!(
            ht_03_provenance::next_stage(&batch),
            Some(Stage::Processing)
        );

        let token = ht_03_provenance::token_for("HERB001", Stage::Processing);
        assert_eq!(token.content, "HERB001");
    }

    #[tokio::test]
    async fn test_projected_record_matches_submitted_args() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB010")],
                Some("HERB010"),
            )
            .await
            .unwrap();

        let batch = gateway.projector().get_batch("HERB010").unwrap();
        let collection = batch.collection.unwrap();
        assert_eq!(collection.species, "Ashwagandha");
        assert_eq!(collection.weight, 2500.0);
        assert_eq!(collection.latitude, 26.9124);
        assert_eq!(collection.longitude, 75.7873);
        assert_eq!(collection.collector_id.as_deref(), Some("FARMER_001"));
        assert_eq!(
            collection.timestamp.to_rfc3339(),
            "2025-06-01T08:30:00+00:00"
        );
    }

    #[tokio::test]
    async fn test_duplicate_submission_keeps_first_projection() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB011")],
                Some("HERB011"),
            )
            .await
            .unwrap();

        let replayed = serde_json::json!({"species": "Tulsi", "weight": 1.0}).to_string();
        gateway
            .invoke("RecordCollectionEvent", &[replayed], Some("HERB011"))
            .await
            .unwrap();

        // Both submissions are in the audit log; the projection kept the
        // first payload.
        assert_eq!(gateway.log().len(), 2);
        let batch = gateway.projector().get_batch("HERB011").unwrap();
        assert_eq!(batch.completed_steps, vec![Stage::Collection]);
        assert_eq!(batch.collection.unwrap().species, "Ashwagandha");
    }

    #[tokio::test]
    async fn test_transaction_feed_is_newest_first() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        for batch in ["HERB020", "HERB021", "HERB022"] {
            gateway
                .invoke(
                    "RecordCollectionEvent",
                    &[collection_payload(batch)],
                    Some(batch),
                )
                .await
                .unwrap();
        }

        let feed = gateway.log().recent(2);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].batch_id, "HERB022");
        assert_eq!(feed[1].batch_id, "HERB021");
        assert!(feed.iter().all(|r| r.origin == Origin::Real));
    }

    #[tokio::test]
    async fn test_provenance_query_reflects_submissions() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB030")],
                Some("HERB030"),
            )
            .await
            .unwrap();

        let result = gateway.provenance("HERB030").await.unwrap();
        assert_eq!(result.origin, Origin::Real);
        let doc = result.payload_json().unwrap();
        assert_eq!(doc["batchId"], "HERB030");
        assert_eq!(doc["events"][0]["function"], "RecordCollectionEvent");
    }

    #[tokio::test]
    async fn test_raw_transaction_exposes_ledger_placement() {
        let (_ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        let outcome = gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB040")],
                Some("HERB040"),
            )
            .await
            .unwrap();

        let raw = gateway
            .raw_transaction(&outcome.transaction_id)
            .await
            .unwrap();
        assert_eq!(raw.block_number, 1);
        assert_eq!(raw.validation_code, 0);
        assert_eq!(raw.channel, "ayurveda-channel");
    }

    #[tokio::test]
    async fn test_unresolvable_placement_yields_marked_estimate() {
        let (ledger, gateway) = gateway_stack(Default::default());
        gateway.initialize(admin_identity()).await;

        ledger.conceal_placement(true);
        let outcome = gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB050")],
                Some("HERB050"),
            )
            .await
            .unwrap();

        // Still a real, committed transaction; only the placement degraded.
        assert_eq!(outcome.origin, Origin::Real);
        assert!(outcome.block.is_estimated());

        let record = gateway.log().get(&outcome.transaction_id).unwrap();
        assert!(record.block.is_estimated());
    }
}
