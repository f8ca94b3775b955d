//! # Fallback Policy Integration
//!
//! A disconnected gateway under the strict policy refuses every request
//! with an explicit unavailable error; under the demonstration policy it
//! serves synthesized results that are structurally impossible to mistake
//! for ledger provenance.

#[cfg(test)]
mod tests {
    use ht_02_tx_gateway::{FallbackPolicy, GatewayConfig};
    use shared_types::{GatewayError, Origin};

    use crate::integration::fixtures::*;

    fn demo_config() -> GatewayConfig {
        GatewayConfig {
            fallback: FallbackPolicy::Demo,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_strict_disconnected_refuses_and_records_nothing() {
        let (ledger, gateway) = gateway_stack(Default::default());
        ledger.set_reachable(false);
        gateway.initialize(admin_identity()).await;

        let health = gateway.health();
        assert!(!health.connected);
        assert!(!health.reachable);

        let invoke_err = gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB001")],
                Some("HERB001"),
            )
            .await
            .unwrap_err();
        assert!(matches!(invoke_err, GatewayError::ServiceUnavailable));

        let query_err = gateway.provenance("HERB001").await.unwrap_err();
        assert!(matches!(query_err, GatewayError::ServiceUnavailable));

        // No audit record, no projection: an unavailable ledger leaves no
        // trace of the attempted submission.
        assert_eq!(gateway.log().len(), 0);
        assert!(gateway.projector().get_batch("HERB001").is_none());
    }

    #[tokio::test]
    async fn test_demo_disconnected_serves_tagged_results() {
        let (ledger, gateway) = gateway_stack(demo_config());
        ledger.set_reachable(false);
        gateway.initialize(admin_identity()).await;

        assert!(!gateway.health().connected);

        let outcome = gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB001")],
                Some("HERB001"),
            )
            .await
            .unwrap();
        assert_eq!(outcome.origin, Origin::Fallback);
        assert!(outcome.block.is_estimated());
        assert!(outcome.transaction_id.starts_with("fallback-"));

        let query = gateway.provenance("HERB001").await.unwrap();
        assert_eq!(query.origin, Origin::Fallback);

        // Downstream artifacts carry the tag too.
        let record = gateway.log().get(&outcome.transaction_id).unwrap();
        assert_eq!(record.origin, Origin::Fallback);
        assert!(record.block.is_estimated());
    }

    #[tokio::test]
    async fn test_demo_with_reachable_ledger_stays_real() {
        // The demo policy only engages when the network is down; against a
        // live ledger it behaves exactly like strict.
        let (_ledger, gateway) = gateway_stack(demo_config());
        gateway.initialize(admin_identity()).await;

        assert!(gateway.health().connected);
        let outcome = gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB001")],
                Some("HERB001"),
            )
            .await
            .unwrap();
        assert_eq!(outcome.origin, Origin::Real);
        assert!(!outcome.block.is_estimated());
    }

    #[tokio::test]
    async fn test_strict_gateway_never_initializes_into_fallback() {
        let (ledger, gateway) = gateway_stack(Default::default());
        ledger.set_reachable(false);
        gateway.initialize(admin_identity()).await;

        // Even after the network comes back, the strict gateway stays
        // disconnected until restarted; it must keep refusing rather than
        // silently resume with a half-initialized backend.
        ledger.set_reachable(true);
        let err = gateway
            .invoke(
                "RecordCollectionEvent",
                &[collection_payload("HERB001")],
                Some("HERB001"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ServiceUnavailable));
        assert!(!gateway.health().connected);
    }

    #[tokio::test]
    async fn test_seeded_baseline_survives_reset_only_explicitly() {
        let config = GatewayConfig {
            seed_demo_batches: true,
            ..Default::default()
        };
        let (_ledger, gateway) = gateway_stack(config);
        gateway.initialize(admin_identity()).await;

        let seeded = gateway.projector().get_batch("HERB001").unwrap();
        assert_eq!(seeded.completed_steps.len(), 1);
        assert_eq!(seeded.collection.unwrap().species, "Ashwagandha");

        gateway
            .invoke(
                "QualityAttestation",
                &[quality_payload()],
                Some("HERB001"),
            )
            .await
            .unwrap();
        assert_eq!(
            gateway
                .projector()
                .get_batch("HERB001")
                .unwrap()
                .completed_steps
                .len(),
            2
        );

        gateway.reset_state();
        // Reset cleared everything and re-seeded the baseline explicitly.
        let reseeded = gateway.projector().get_batch("HERB001").unwrap();
        assert_eq!(reseeded.completed_steps.len(), 1);
        assert_eq!(gateway.log().len(), 0);
    }
}
