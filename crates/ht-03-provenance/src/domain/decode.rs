//! Stage payload decoding.
//!
//! The first submission argument carries a JSON object with the stage
//! fields. Submitters vary in shape: quality payloads may nest the
//! measurements under `testResults` or carry them flat under legacy names
//! (`moistureContent`, `pesticideLevel`, `heavyMetalsLevel`); both are
//! accepted. Missing timestamps default to the submission instant.

use chrono::{DateTime, Utc};
use serde_json::Value;

use shared_types::{
    CollectionRecord, ManufacturingRecord, ProcessingRecord, ProjectionError, QualityRecord, Stage,
};

/// A decoded stage payload, ready to be written into the batch aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum StagePayload {
    /// Decoded `RecordCollectionEvent` payload.
    Collection(CollectionRecord),
    /// Decoded `QualityAttestation` payload.
    Quality(QualityRecord),
    /// Decoded `TransferCustody` payload.
    Processing(ProcessingRecord),
    /// Decoded `BatchCreation` payload.
    Manufacturing(ManufacturingRecord),
}

/// Decode the raw JSON argument for `stage`.
pub fn decode_stage_payload(
    stage: Stage,
    raw: &str,
    now: DateTime<Utc>,
) -> Result<StagePayload, ProjectionError> {
    let data: Value = serde_json::from_str(raw).map_err(|e| ProjectionError::InvalidPayload {
        function: stage.function_name().to_string(),
        reason: e.to_string(),
    })?;
    if !data.is_object() {
        return Err(ProjectionError::InvalidPayload {
            function: stage.function_name().to_string(),
            reason: "payload is not a JSON object".to_string(),
        });
    }

    let payload = match stage {
        Stage::Collection => StagePayload::Collection(CollectionRecord {
            species: str_field(&data, "species"),
            weight: num_field(&data, "weight"),
            latitude: num_field(&data, "latitude"),
            longitude: num_field(&data, "longitude"),
            timestamp: time_field(&data, "timestamp", now),
            collector_id: opt_str_field(&data, "collectorId"),
        }),
        Stage::Quality => {
            let tests = data.get("testResults").filter(|v| v.is_object());
            let measurement = |nested: &str, flat_legacy: &str| -> f64 {
                match tests {
                    Some(t) => num_field(t, nested),
                    None => data
                        .get(nested)
                        .or_else(|| data.get(flat_legacy))
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0),
                }
            };
            StagePayload::Quality(QualityRecord {
                moisture: measurement("moisture", "moistureContent"),
                pesticides: measurement("pesticides", "pesticideLevel"),
                heavy_metals: measurement("heavyMetals", "heavyMetalsLevel"),
                passed: data.get("passed").and_then(Value::as_bool).unwrap_or(false),
                test_date: time_field(&data, "timestamp", now),
                lab_tech_id: opt_str_field(&data, "labTechId"),
            })
        }
        Stage::Processing => StagePayload::Processing(ProcessingRecord {
            method: str_field(&data, "processType"),
            temperature: num_field(&data, "temperature"),
            duration: num_field(&data, "duration"),
            yield_percent: num_field(&data, "yield"),
            process_date: time_field(&data, "timestamp", now),
            processor_id: opt_str_field(&data, "processorId"),
        }),
        Stage::Manufacturing => StagePayload::Manufacturing(ManufacturingRecord {
            product_name: str_field(&data, "productName"),
            batch_size: num_field(&data, "batchSize"),
            expiry_date: time_field(&data, "expiryDate", now),
            manufacturing_date: time_field(&data, "timestamp", now),
            manufacturer_id: opt_str_field(&data, "manufacturerId"),
        }),
    };
    Ok(payload)
}

fn str_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_str_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn num_field(data: &Value, key: &str) -> f64 {
    data.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn time_field(data: &Value, key: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    data.get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_collection() {
        let now = Utc::now();
        let raw = r#"{
            "species": "Ashwagandha",
            "weight": 2500,
            "latitude": 26.9124,
            "longitude": 75.7873,
            "timestamp": "2025-06-01T08:30:00Z",
            "collectorId": "FARMER_001"
        }"#;

        let payload = decode_stage_payload(Stage::Collection, raw, now).unwrap();
        let StagePayload::Collection(record) = payload else {
            panic!("wrong stage");
        };
        assert_eq!(record.species, "Ashwagandha");
        assert_eq!(record.weight, 2500.0);
        assert_eq!(record.collector_id.as_deref(), Some("FARMER_001"));
        assert_eq!(record.timestamp.to_rfc3339(), "2025-06-01T08:30:00+00:00");
    }

    #[test]
    fn test_decode_quality_nested_test_results() {
        let now = Utc::now();
        let raw = r#"{
            "testResults": {"moisture": 8.2, "pesticides": 0.01, "heavyMetals": 0.003},
            "passed": true
        }"#;

        let StagePayload::Quality(record) =
            decode_stage_payload(Stage::Quality, raw, now).unwrap()
        else {
            panic!("wrong stage");
        };
        assert_eq!(record.moisture, 8.2);
        assert_eq!(record.pesticides, 0.01);
        assert_eq!(record.heavy_metals, 0.003);
        assert!(record.passed);
    }

    #[test]
    fn test_decode_quality_flat_legacy_names() {
        let now = Utc::now();
        let raw = r#"{
            "moistureContent": 9.1,
            "pesticideLevel": 0.02,
            "heavyMetalsLevel": 0.001,
            "passed": false
        }"#;

        let StagePayload::Quality(record) =
            decode_stage_payload(Stage::Quality, raw, now).unwrap()
        else {
            panic!("wrong stage");
        };
        assert_eq!(record.moisture, 9.1);
        assert_eq!(record.pesticides, 0.02);
        assert!(!record.passed);
    }

    #[test]
    fn test_decode_processing_yield() {
        let now = Utc::now();
        let raw = r#"{"processType": "drying", "temperature": 45, "duration": 12, "yield": 88.5}"#;

        let StagePayload::Processing(record) =
            decode_stage_payload(Stage::Processing, raw, now).unwrap()
        else {
            panic!("wrong stage");
        };
        assert_eq!(record.method, "drying");
        assert_eq!(record.yield_percent, 88.5);
    }

    #[test]
    fn test_missing_timestamp_defaults_to_submission_instant() {
        let now = Utc::now();
        let raw = r#"{"productName": "Ashwagandha Capsules", "batchSize": 10000}"#;

        let StagePayload::Manufacturing(record) =
            decode_stage_payload(Stage::Manufacturing, raw, now).unwrap()
        else {
            panic!("wrong stage");
        };
        assert_eq!(record.manufacturing_date, now);
        assert_eq!(record.expiry_date, now);
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let err = decode_stage_payload(Stage::Collection, "[1,2,3]", Utc::now()).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidPayload { .. }));

        let err = decode_stage_payload(Stage::Collection, "not json", Utc::now()).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidPayload { .. }));
    }
}
