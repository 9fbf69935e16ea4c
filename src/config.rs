// Robot-wide constants and motor controller defaults
//
// Values here are build-time defaults. `RobotConstants::from_json_file` lets a
// robot variant override any subset of them without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};

// Nominal battery voltage used as voltage-compensation saturation (volts)
pub const ROBOT_VOLTAGE: f64 = 10.0;

// Talon SRX (brushed) defaults
pub const TALON_SRX_DEFAULT_CONTINUOUS_LIMIT: i32 = 38; // A
pub const TALON_SRX_DEFAULT_PEAK_LIMIT: i32 = 45; // A
pub const TALON_SRX_DEFAULT_PEAK_DURATION: i32 = 125; // ms

// Spark MAX (brushless) default stall limit
pub const SPARK_MAX_DEFAULT_CURRENT_LIMIT: u32 = 60; // A

/// Talon FX (Falcon 500) current limiting and firmware expectations.
///
/// Stator current is the current through the motor windings; limiting it
/// bounds acceleration and heat. Supply current is the current drawn from the
/// bus; limiting it keeps breakers in the power distribution panel from
/// tripping. For both, once current stays above the trigger threshold for the
/// trigger duration the controller clamps to the sustained limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FalconConstants {
    pub stator_limit_enable: bool,
    pub stator_current_limit: f64,     // A
    pub stator_trigger_threshold: f64, // A
    pub stator_trigger_duration: f64,  // s

    pub supply_limit_enable: bool,
    pub supply_current_limit: f64,     // A
    pub supply_trigger_threshold: f64, // A
    pub supply_trigger_duration: f64,  // s

    /// Firmware every Talon FX on the robot is expected to run
    pub firmware_version: i32,
    /// Abort construction on a firmware mismatch instead of warning
    pub break_on_wrong_firmware: bool,
}

impl FalconConstants {
    pub const DEFAULT: Self = Self {
        stator_limit_enable: false,
        stator_current_limit: 30.0,
        stator_trigger_threshold: 35.0,
        stator_trigger_duration: 0.1,

        supply_limit_enable: true,
        supply_current_limit: 35.0,
        supply_trigger_threshold: 40.0,
        supply_trigger_duration: 0.1,

        firmware_version: 5633, // 22.1.1.0
        break_on_wrong_firmware: false,
    };
}

impl Default for FalconConstants {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything the motor factory reads from the robot's constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConstants {
    pub robot_voltage: f64,
    pub falcon: FalconConstants,
}

impl RobotConstants {
    pub const DEFAULT: Self = Self {
        robot_voltage: ROBOT_VOLTAGE,
        falcon: FalconConstants::DEFAULT,
    };

    /// Parse constants from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for RobotConstants {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Errors loading a constants override file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid constants file: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{ "falcon": { "break_on_wrong_firmware": true, "firmware_version": 5890 } }"#;
        let constants = RobotConstants::from_json_str(json).unwrap();

        assert_eq!(constants.robot_voltage, ROBOT_VOLTAGE);
        assert!(constants.falcon.break_on_wrong_firmware);
        assert_eq!(constants.falcon.firmware_version, 5890);
        assert_eq!(
            constants.falcon.supply_current_limit,
            FalconConstants::DEFAULT.supply_current_limit
        );
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(RobotConstants::from_json_str("{}").unwrap(), RobotConstants::DEFAULT);
    }

    #[test]
    fn test_bad_json_rejected() {
        let err = RobotConstants::from_json_str("{ robot_voltage: 12 }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RobotConstants::from_json_file("/nonexistent/robot_constants.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
