// Vendor driver contracts for the three controller families
//
// The factory only needs the configuration surface of each driver. Robots
// wrap their vendor SDK handles in these traits; tests use recording doubles.

use serde::Serialize;

use crate::config::FalconConstants;

/// Status returned by a driver configuration call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusCode {
    #[default]
    Ok,
    Error(i32),
}

impl StatusCode {
    pub fn is_ok(self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

/// Talon behavior with zero commanded output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NeutralMode {
    Coast,
    Brake,
}

/// Spark MAX behavior with zero commanded output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IdleMode {
    Coast,
    Brake,
}

/// Motor wired to a Spark MAX
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MotorType {
    Brushed,
    Brushless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedbackDevice {
    IntegratedSensor,
    QuadEncoder,
    Analog,
}

/// Settings applied to a Talon SRX in one `config_all_settings` call
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TalonSrxConfiguration {
    pub continuous_current_limit: i32, // A
    pub peak_current_limit: i32,       // A
    pub peak_current_duration: i32,    // ms
    pub voltage_comp_saturation: f64,  // V
}

impl TalonSrxConfiguration {
    pub const fn new(
        continuous_current_limit: i32,
        peak_current_limit: i32,
        peak_current_duration: i32,
        voltage_comp_saturation: f64,
    ) -> Self {
        Self {
            continuous_current_limit,
            peak_current_limit,
            peak_current_duration,
            voltage_comp_saturation,
        }
    }
}

/// Sustained-limit / trigger settings shared by stator and supply limiting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CurrentLimitConfiguration {
    pub enable: bool,
    pub current_limit: f64,     // A
    pub trigger_threshold: f64, // A
    pub trigger_duration: f64,  // s
}

impl CurrentLimitConfiguration {
    pub const fn new(
        enable: bool,
        current_limit: f64,
        trigger_threshold: f64,
        trigger_duration: f64,
    ) -> Self {
        Self {
            enable,
            current_limit,
            trigger_threshold,
            trigger_duration,
        }
    }

    pub const fn default_stator(falcon: &FalconConstants) -> Self {
        Self::new(
            falcon.stator_limit_enable,
            falcon.stator_current_limit,
            falcon.stator_trigger_threshold,
            falcon.stator_trigger_duration,
        )
    }

    pub const fn default_supply(falcon: &FalconConstants) -> Self {
        Self::new(
            falcon.supply_limit_enable,
            falcon.supply_current_limit,
            falcon.supply_trigger_threshold,
            falcon.supply_trigger_duration,
        )
    }
}

/// Settings applied to a Talon FX in one `config_all_settings` call
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TalonFxConfiguration {
    pub stator_curr_limit: CurrentLimitConfiguration,
    pub supply_curr_limit: CurrentLimitConfiguration,
    pub voltage_comp_saturation: f64, // V
}

impl TalonFxConfiguration {
    pub const fn new(
        stator_curr_limit: CurrentLimitConfiguration,
        supply_curr_limit: CurrentLimitConfiguration,
        voltage_comp_saturation: f64,
    ) -> Self {
        Self {
            stator_curr_limit,
            supply_curr_limit,
            voltage_comp_saturation,
        }
    }
}

/// Brushed motor controller (Talon SRX)
pub trait TalonSrx {
    fn config_factory_default(&mut self) -> StatusCode;

    fn config_all_settings(&mut self, config: &TalonSrxConfiguration) -> StatusCode;

    fn enable_current_limit(&mut self, enable: bool);

    fn enable_voltage_compensation(&mut self, enable: bool);

    fn set_neutral_mode(&mut self, mode: NeutralMode);
}

/// Brushless motor controller (Spark MAX)
pub trait SparkMax {
    fn restore_factory_defaults(&mut self) -> StatusCode;

    fn enable_voltage_compensation(&mut self, nominal_voltage: f64) -> StatusCode;

    fn set_smart_current_limit(&mut self, stall_limit: u32) -> StatusCode;

    fn set_idle_mode(&mut self, mode: IdleMode) -> StatusCode;

    /// Persist the current configuration across power cycles
    fn burn_flash(&mut self) -> StatusCode;
}

/// Integrated-encoder motor controller (Talon FX / Falcon 500)
pub trait TalonFx {
    fn firmware_version(&mut self) -> i32;

    fn config_factory_default(&mut self) -> StatusCode;

    fn config_all_settings(&mut self, config: &TalonFxConfiguration) -> StatusCode;

    fn enable_voltage_compensation(&mut self, enable: bool);

    fn set_neutral_mode(&mut self, mode: NeutralMode);

    fn config_selected_feedback_sensor(&mut self, device: FeedbackDevice) -> StatusCode;
}

/// Opens driver handles on the CAN bus
pub trait DeviceProvider {
    type Srx: TalonSrx;
    type Spark: SparkMax;
    type Fx: TalonFx;

    fn talon_srx(&mut self, id: i32) -> Self::Srx;

    fn spark_max(&mut self, id: i32, motor_type: MotorType) -> Self::Spark;

    /// `can_bus` is "rio" for the roboRIO's own bus
    fn talon_fx(&mut self, id: i32, can_bus: &str) -> Self::Fx;
}
