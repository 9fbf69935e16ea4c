// Motor controller configuration for the robot's CAN bus
//
// Provides:
// - Driver contracts for the Talon SRX, Spark MAX and Talon FX families
// - A factory that applies the team's default configuration to each
// - The Talon FX firmware guard

pub mod device;
mod factory;
mod firmware;

#[cfg(test)]
pub(crate) mod mock;

pub use device::{
    CurrentLimitConfiguration, DeviceProvider, FeedbackDevice, IdleMode, MotorType, NeutralMode,
    SparkMax, StatusCode, TalonFx, TalonFxConfiguration, TalonSrx, TalonSrxConfiguration,
};
pub use factory::{MotorFactory, ABSENT_ID};
pub use firmware::{check_firmware, mismatch_message, MotorError};
