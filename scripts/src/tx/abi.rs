use alloy::sol;

sol! {
#[sol(rpc)]
interface IAnomalyLogger {
    struct Anomaly {
        uint256 timestamp;
        string sensorId;
        int256 dataValue;
        string anomalyType;
        string explanation;
    }

    function logAnomaly(uint256 timestamp, string sensorId, int256 dataValue, string anomalyType, string explanation) external;

    function getAllAnomalies() external view returns (Anomaly[] memory);
}

}

#[cfg(test)]
mod tests {
    use alloy::sol_types::SolCall;

    use super::IAnomalyLogger;

    #[test]
    fn selectors_match_the_deployed_interface() {
        assert_eq!(
            IAnomalyLogger::logAnomalyCall::SIGNATURE,
            "logAnomaly(uint256,string,int256,string,string)"
        );
        assert_eq!(IAnomalyLogger::getAllAnomaliesCall::SIGNATURE, "getAllAnomalies()");
    }
}
