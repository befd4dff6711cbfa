// Path: crates/ocr2/src/config.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Median reporting plugin parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportingPluginConfig {
    /// Whether the report deviation threshold is infinite.
    pub alpha_report_infinite: bool,
    /// The report deviation threshold in parts per billion.
    pub alpha_report_ppb: u64,
    /// Whether the accept deviation threshold is infinite.
    pub alpha_accept_infinite: bool,
    /// The accept deviation threshold in parts per billion.
    pub alpha_accept_ppb: u64,
    /// The heartbeat.
    pub delta_c_nanoseconds: i64,
}

/// Operator-set OCR2 parameters distributed out-of-band.
///
/// Durations are signed so that a negative value from user input survives
/// until validation rejects it. Public keys are 32 bytes of hex, with or
/// without their network prefix or a `0x`; the codec strips both. Decoding
/// always yields bare lowercase hex, so a config only survives an encode and
/// decode unchanged when its keys are already in that form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OffchainConfig {
    pub delta_progress_nanoseconds: i64,
    pub delta_resend_nanoseconds: i64,
    pub delta_round_nanoseconds: i64,
    pub delta_grace_nanoseconds: i64,
    pub delta_stage_nanoseconds: i64,
    pub r_max: i64,
    pub s: Vec<i64>,
    pub offchain_public_keys: Vec<String>,
    pub peer_ids: Vec<String>,
    pub reporting_plugin_config: ReportingPluginConfig,
    pub max_duration_query_nanoseconds: i64,
    pub max_duration_observation_nanoseconds: i64,
    pub max_duration_report_nanoseconds: i64,
    pub max_duration_should_accept_finalized_report_nanoseconds: i64,
    pub max_duration_should_transmit_accepted_report_nanoseconds: i64,
}

impl OffchainConfig {
    /// Every nanosecond duration field, by its camelCase name.
    pub fn durations(&self) -> [(&'static str, i64); 10] {
        [
            ("deltaProgressNanoseconds", self.delta_progress_nanoseconds),
            ("deltaResendNanoseconds", self.delta_resend_nanoseconds),
            ("deltaRoundNanoseconds", self.delta_round_nanoseconds),
            ("deltaGraceNanoseconds", self.delta_grace_nanoseconds),
            ("deltaStageNanoseconds", self.delta_stage_nanoseconds),
            ("maxDurationQueryNanoseconds", self.max_duration_query_nanoseconds),
            ("maxDurationObservationNanoseconds", self.max_duration_observation_nanoseconds),
            ("maxDurationReportNanoseconds", self.max_duration_report_nanoseconds),
            (
                "maxDurationShouldAcceptFinalizedReportNanoseconds",
                self.max_duration_should_accept_finalized_report_nanoseconds,
            ),
            (
                "maxDurationShouldTransmitAcceptedReportNanoseconds",
                self.max_duration_should_transmit_accepted_report_nanoseconds,
            ),
        ]
    }
}

/// Renders a config as a flat JSON object for diffing, merging `extra` on top.
///
/// An absent config (the decode fallback) renders the same as
/// `OffchainConfig::default()`, so a first proposal diffs against zeros.
pub fn prepare_for_diff(config: &OffchainConfig, extra: Map<String, Value>) -> Value {
    let mut out = match serde_json::to_value(config) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (k, v) in extra {
        out.insert(k, v);
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn diff_view_merges_extra_fields() {
        let cfg = OffchainConfig {
            r_max: 3,
            offchain_public_keys: vec!["ab".into()],
            ..Default::default()
        };
        let mut extra = Map::new();
        extra.insert("f".into(), json!("1"));
        let view = prepare_for_diff(&cfg, extra);
        assert_eq!(view["rMax"], json!(3));
        assert_eq!(view["f"], json!("1"));
        assert_eq!(view["offchainPublicKeys"], json!(["ab"]));
        assert_eq!(view["reportingPluginConfig"]["alphaReportPpb"], json!(0));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: OffchainConfig =
            serde_json::from_value(json!({ "deltaProgressNanoseconds": 8000000000u64 })).unwrap();
        assert_eq!(cfg.delta_progress_nanoseconds, 8_000_000_000);
        assert!(cfg.s.is_empty());
    }
}
