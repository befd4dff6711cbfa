// Path: crates/ocr2/src/validator.rs

use crate::config::OffchainConfig;
use gauntlet_types::error::{InstructionError, ValidationFailure};

/// The maximum number of oracles an OCR2 aggregator supports.
pub const ORACLES_MAX_LENGTH: i64 = 31;

/// The resource exhaustion safe interval: 200ms.
pub const SAFE_INTERVAL_NANOSECONDS: i64 = 200 * 1_000_000;

/// The exclusive upper bound on the length of `s`.
pub const S_MAX_LENGTH: usize = 1000;

const RULE: &str = "validOffchainConfig";

/// Returns one message per violated rule; empty when the config is valid.
///
/// Sums are computed in `i128` so that durations near `i64::MAX` cannot wrap.
pub fn offchain_config_violations(config: &OffchainConfig) -> Vec<String> {
    let mut errors = Vec::new();

    for (name, value) in config.durations() {
        if value < 0 {
            errors.push(format!("{} must be non-negative", name));
        }
    }
    if config.reporting_plugin_config.delta_c_nanoseconds < 0 {
        errors.push("deltaCNanoseconds must be non-negative".to_string());
    }

    if config.delta_progress_nanoseconds < SAFE_INTERVAL_NANOSECONDS {
        errors.push(format!(
            "deltaProgressNanoseconds ({} ns) is set below the resource exhaustion safe interval ({} ns)",
            config.delta_progress_nanoseconds, SAFE_INTERVAL_NANOSECONDS
        ));
    }
    if config.delta_resend_nanoseconds < SAFE_INTERVAL_NANOSECONDS {
        errors.push(format!(
            "deltaResendNanoseconds ({} ns) is set below the resource exhaustion safe interval ({} ns)",
            config.delta_resend_nanoseconds, SAFE_INTERVAL_NANOSECONDS
        ));
    }

    if config.delta_round_nanoseconds >= config.delta_progress_nanoseconds {
        errors.push(format!(
            "deltaRoundNanoseconds ({}) must be less than deltaProgressNanoseconds ({})",
            config.delta_round_nanoseconds, config.delta_progress_nanoseconds
        ));
    }

    let report_generation = i128::from(config.max_duration_query_nanoseconds)
        + i128::from(config.max_duration_observation_nanoseconds)
        + i128::from(config.max_duration_report_nanoseconds);
    if report_generation >= i128::from(config.delta_progress_nanoseconds) {
        errors.push(format!(
            "sum of MaxDurationQuery/Observation/Report ({}) must be less than deltaProgressNanoseconds ({})",
            report_generation, config.delta_progress_nanoseconds
        ));
    }

    if config.r_max <= 0 || config.r_max >= 255 {
        errors.push(format!(
            "rMax ({}) must be greater than zero and less than 255",
            config.r_max
        ));
    }

    if config.s.len() >= S_MAX_LENGTH {
        errors.push(format!(
            "Length of S ({}) must be less than {}",
            config.s.len(),
            S_MAX_LENGTH
        ));
    }
    for (i, s) in config.s.iter().enumerate() {
        if *s < 0 || *s > ORACLES_MAX_LENGTH {
            errors.push(format!(
                "S[{}] ({}) must be between 0 and Max Oracles ({})",
                i, s, ORACLES_MAX_LENGTH
            ));
        }
    }

    errors
}

/// Validates an offchain config, reporting every violated rule.
pub fn validate_offchain_config(config: &OffchainConfig) -> Result<(), InstructionError> {
    let violations = offchain_config_violations(config);
    if violations.is_empty() {
        return Ok(());
    }
    Err(InstructionError::Validation(
        violations
            .into_iter()
            .map(|m| ValidationFailure::new(RULE, m))
            .collect(),
    ))
}
