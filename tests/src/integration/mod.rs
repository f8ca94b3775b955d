//! Cross-crate integration scenarios.

pub mod concurrency;
pub mod fallback_policy;
pub mod gateway_flow;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use ht_01_ledger_client::{
        ConnectionProfile, InMemoryLedger, LedgerClient, LedgerIdentity,
    };
    use ht_02_tx_gateway::{GatewayConfig, TransactionGateway};
    use ht_03_provenance::BatchProjector;

    /// A gateway wired over a fresh in-memory ledger, not yet initialized.
    pub fn gateway_stack(config: GatewayConfig) -> (Arc<InMemoryLedger>, Arc<TransactionGateway>) {
        let ledger = Arc::new(InMemoryLedger::new());
        let rpc: Arc<dyn ht_01_ledger_client::LedgerRpc> = ledger.clone();
        let client = Arc::new(LedgerClient::new(ConnectionProfile::default(), rpc).unwrap());
        let projector = Arc::new(BatchProjector::new());
        let gateway =
            Arc::new(TransactionGateway::new(config, client, projector).unwrap());
        (ledger, gateway)
    }

    pub fn admin_identity() -> LedgerIdentity {
        LedgerIdentity::development("FarmersCoopMSP")
    }

    pub fn collection_payload(batch_id: &str) -> String {
        serde_json::json!({
            "batchId": batch_id,
            "species": "Ashwagandha",
            "weight": 2500.0,
            "latitude": 26.9124,
            "longitude": 75.7873,
            "timestamp": "2025-06-01T08:30:00Z",
            "collectorId": "FARMER_001",
        })
        .to_string()
    }

    pub fn quality_payload() -> String {
        serde_json::json!({
            "testResults": {
                "moisture": 8.2,
                "pesticides": 0.01,
                "heavyMetals": 0.003,
            },
            "passed": true,
            "labTechId": "LAB_007",
        })
        .to_string()
    }

    pub fn processing_payload() -> String {
        serde_json::json!({
            "processType": "shade-drying",
            "temperature": 38.5,
            "duration": 48.0,
            "yield": 86.0,
            "processorId": "PROC_003",
        })
        .to_string()
    }

    pub fn manufacturing_payload() -> String {
        serde_json::json!({
            "productName": "Ashwagandha Root Capsules",
            "batchSize": 10000.0,
            "expiryDate": "2027-06-01T00:00:00Z",
            "manufacturerId": "MFG_002",
        })
        .to_string()
    }
}
