use alloy::primitives::Address;
use chrono::DateTime;
use serde::Serialize;

use crate::{
    errors::ScriptError,
    tx::{abi::IAnomalyLogger, client::RpcProvider},
};

/// An anomaly as stored by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyRecord {
    pub timestamp: u64,
    pub datetime: String,
    pub sensor_id: String,
    pub data_value: i64,
    pub anomaly_type: String,
    pub explanation: String,
}

impl TryFrom<IAnomalyLogger::Anomaly> for AnomalyRecord {
    type Error = ScriptError;

    fn try_from(anomaly: IAnomalyLogger::Anomaly) -> Result<Self, Self::Error> {
        let timestamp = u64::try_from(anomaly.timestamp)
            .map_err(|e| ScriptError::ContractInteraction(format!("timestamp: {e}")))?;
        let data_value = i64::try_from(anomaly.dataValue)
            .map_err(|e| ScriptError::ContractInteraction(format!("data value: {e}")))?;

        Ok(Self {
            timestamp,
            datetime: format_timestamp(timestamp),
            sensor_id: anomaly.sensorId,
            data_value,
            anomaly_type: anomaly.anomalyType,
            explanation: anomaly.explanation,
        })
    }
}

/// Render a unix timestamp as an ISO 8601 UTC datetime
fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|datetime| datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Get every anomaly logged on the contract
pub async fn get_all_anomalies(
    contract_address: Address,
    provider: RpcProvider,
) -> Result<Vec<AnomalyRecord>, ScriptError> {
    // Build our contract
    let contract = IAnomalyLogger::new(contract_address, provider);

    // Read the smart contract
    let anomalies = contract
        .getAllAnomalies()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    anomalies.into_iter().map(AnomalyRecord::try_from).collect()
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{I256, U256};

    use super::*;

    fn anomaly(timestamp: U256, data_value: I256) -> IAnomalyLogger::Anomaly {
        IAnomalyLogger::Anomaly {
            timestamp,
            sensorId: "temp_sensor_01".to_string(),
            dataValue: data_value,
            anomalyType: "Environmental Anomaly (Time Series)".to_string(),
            explanation: "Detected via Isolation Forest".to_string(),
        }
    }

    #[test]
    fn converts_contract_records() {
        let record = AnomalyRecord::try_from(anomaly(
            U256::from(1_700_000_000u64),
            I256::try_from(-12i64).unwrap(),
        ))
        .unwrap();

        assert_eq!(record.timestamp, 1_700_000_000);
        assert_eq!(record.datetime, "2023-11-14T22:13:20");
        assert_eq!(record.sensor_id, "temp_sensor_01");
        assert_eq!(record.data_value, -12);
    }

    #[test]
    fn json_shape_matches_backend_api() {
        let record =
            AnomalyRecord::try_from(anomaly(U256::ZERO, I256::try_from(999i64).unwrap())).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["datetime"], "1970-01-01T00:00:00");
        assert_eq!(value["data_value"], 999);
        for key in ["timestamp", "sensor_id", "anomaly_type", "explanation"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = AnomalyRecord::try_from(anomaly(U256::MAX, I256::ZERO)).unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }
}
