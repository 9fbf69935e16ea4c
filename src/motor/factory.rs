// Motor controller factory
//
// Builds fully configured controllers so every mechanism starts from the same
// current limits, voltage compensation posture and brake mode. Each family has
// a "full" constructor and default forms that delegate to it.

use tracing::{debug, info};

use super::device::*;
use super::firmware::{check_firmware, MotorError};
use crate::config::{
    RobotConstants, SPARK_MAX_DEFAULT_CURRENT_LIMIT, TALON_SRX_DEFAULT_CONTINUOUS_LIMIT,
    TALON_SRX_DEFAULT_PEAK_DURATION, TALON_SRX_DEFAULT_PEAK_LIMIT,
};
use crate::station::{DriverStation, Platform, RuntimeKind, TracingDriverStation};

/// CAN id meaning "this controller is not installed on this robot"
pub const ABSENT_ID: i32 = -1;

/// Creates configured motor controllers from a [`DeviceProvider`].
///
/// The factory keeps no reference to the handles it returns.
pub struct MotorFactory<D, S = TracingDriverStation, P = RuntimeKind> {
    devices: D,
    station: S,
    platform: P,
    constants: RobotConstants,
}

impl<D: DeviceProvider> MotorFactory<D> {
    /// Factory for real hardware, reporting through the log
    pub fn new(devices: D) -> Self {
        Self::with_parts(devices, TracingDriverStation, RuntimeKind::Real, RobotConstants::DEFAULT)
    }
}

impl<D, S, P> MotorFactory<D, S, P>
where
    D: DeviceProvider,
    S: DriverStation,
    P: Platform,
{
    pub fn with_parts(devices: D, station: S, platform: P, constants: RobotConstants) -> Self {
        Self {
            devices,
            station,
            platform,
            constants,
        }
    }

    pub fn constants(&self) -> &RobotConstants {
        &self.constants
    }

    pub fn devices(&self) -> &D {
        &self.devices
    }

    pub fn station(&self) -> &S {
        &self.station
    }

    // === Talon SRX ===

    /// Record applied by [`create_talon_srx`](Self::create_talon_srx)
    pub fn talon_srx_config(
        &self,
        continuous_current_limit: i32,
        peak_current_limit: i32,
        peak_current_duration: i32,
    ) -> TalonSrxConfiguration {
        TalonSrxConfiguration::new(
            continuous_current_limit,
            peak_current_limit,
            peak_current_duration,
            self.constants.robot_voltage,
        )
    }

    /// Create a Talon SRX with current limiting enabled and brake mode set.
    ///
    /// Voltage compensation saturation is configured but compensation itself
    /// is left disabled; callers enable it when they want it.
    ///
    /// # Arguments
    /// * `continuous_current_limit` - continuous limit in amps
    /// * `peak_current_limit` - peak limit in amps
    /// * `peak_current_duration` - how long the peak is allowed, in ms
    pub fn create_talon_srx(
        &mut self,
        id: i32,
        continuous_current_limit: i32,
        peak_current_limit: i32,
        peak_current_duration: i32,
    ) -> D::Srx {
        let config = self.talon_srx_config(
            continuous_current_limit,
            peak_current_limit,
            peak_current_duration,
        );
        debug!("Creating TalonSRX {} with {:?}", id, config);

        let mut talon = self.devices.talon_srx(id);
        self.observe(id, "configFactoryDefault", talon.config_factory_default());
        self.observe(id, "configAllSettings", talon.config_all_settings(&config));
        talon.enable_current_limit(true);
        talon.enable_voltage_compensation(false);
        talon.set_neutral_mode(NeutralMode::Brake);

        talon
    }

    /// Create a Talon SRX with the default 38 A / 45 A / 125 ms limits
    pub fn create_talon_srx_default(&mut self, id: i32) -> D::Srx {
        self.create_talon_srx(
            id,
            TALON_SRX_DEFAULT_CONTINUOUS_LIMIT,
            TALON_SRX_DEFAULT_PEAK_LIMIT,
            TALON_SRX_DEFAULT_PEAK_DURATION,
        )
    }

    // === Spark MAX ===

    /// Create a Spark MAX with a stall current limit, brake mode and voltage
    /// compensation, then burn the configuration to flash.
    pub fn create_spark_max(
        &mut self,
        id: i32,
        motor_type: MotorType,
        stall_limit: u32,
    ) -> D::Spark {
        debug!(
            "Creating SparkMAX {} ({:?}) with {} A stall limit",
            id, motor_type, stall_limit
        );

        let mut spark = self.devices.spark_max(id, motor_type);
        self.observe(id, "restoreFactoryDefaults", spark.restore_factory_defaults());
        self.observe(
            id,
            "enableVoltageCompensation",
            spark.enable_voltage_compensation(self.constants.robot_voltage),
        );
        self.observe(
            id,
            "setSmartCurrentLimit",
            spark.set_smart_current_limit(stall_limit),
        );
        self.observe(id, "setIdleMode", spark.set_idle_mode(IdleMode::Brake));

        // Must stay last: it persists everything above
        self.observe(id, "burnFlash", spark.burn_flash());
        spark
    }

    /// Create a Spark MAX with the default 60 A stall limit
    pub fn create_spark_max_default(&mut self, id: i32, motor_type: MotorType) -> D::Spark {
        self.create_spark_max(id, motor_type, SPARK_MAX_DEFAULT_CURRENT_LIMIT)
    }

    // === Talon FX (Falcon 500) ===

    /// Record applied by [`create_talon_fx_full`](Self::create_talon_fx_full)
    pub fn talon_fx_config(
        &self,
        stator: CurrentLimitConfiguration,
        supply: CurrentLimitConfiguration,
    ) -> TalonFxConfiguration {
        TalonFxConfiguration::new(stator, supply, self.constants.robot_voltage)
    }

    /// Default stator limit from the Falcon constants
    pub fn default_stator_limit(&self) -> CurrentLimitConfiguration {
        CurrentLimitConfiguration::default_stator(&self.constants.falcon)
    }

    /// Default supply limit from the Falcon constants
    pub fn default_supply_limit(&self) -> CurrentLimitConfiguration {
        CurrentLimitConfiguration::default_supply(&self.constants.falcon)
    }

    /// Create a Talon FX with every current limit option spelled out.
    ///
    /// Returns `Ok(None)` without touching the bus when `id` is [`ABSENT_ID`].
    /// On real hardware the firmware version is checked first; a mismatch
    /// fails with [`MotorError::Io`] when `break_on_wrong_firmware` is set and
    /// only warns otherwise.
    ///
    /// Voltage compensation saturation is configured but left disabled, the
    /// neutral mode is brake and the integrated sensor is selected for
    /// feedback.
    #[allow(clippy::too_many_arguments)]
    pub fn create_talon_fx_full(
        &mut self,
        id: i32,
        can_bus: &str,
        stator_limit_enable: bool,
        stator_current_limit: f64,
        stator_trigger_threshold: f64,
        stator_trigger_duration: f64,
        supply_limit_enable: bool,
        supply_current_limit: f64,
        supply_trigger_threshold: f64,
        supply_trigger_duration: f64,
    ) -> Result<Option<D::Fx>, MotorError> {
        let stator = CurrentLimitConfiguration::new(
            stator_limit_enable,
            stator_current_limit,
            stator_trigger_threshold,
            stator_trigger_duration,
        );
        let supply = CurrentLimitConfiguration::new(
            supply_limit_enable,
            supply_current_limit,
            supply_trigger_threshold,
            supply_trigger_duration,
        );
        self.create_talon_fx_with(id, can_bus, stator, supply)
    }

    /// Create a Talon FX with the stator and supply limits from the constants
    pub fn create_talon_fx(
        &mut self,
        id: i32,
        can_bus: &str,
    ) -> Result<Option<D::Fx>, MotorError> {
        let (stator, supply) = (self.default_stator_limit(), self.default_supply_limit());
        self.create_talon_fx_with(id, can_bus, stator, supply)
    }

    /// Create a Talon FX with a custom supply limit (always enabled).
    ///
    /// Supply limiting keeps the PDP breakers from tripping.
    pub fn create_talon_fx_supply_limit(
        &mut self,
        id: i32,
        can_bus: &str,
        current_limit: f64,
        trigger_threshold: f64,
        trigger_duration: f64,
    ) -> Result<Option<D::Fx>, MotorError> {
        let stator = self.default_stator_limit();
        let supply = CurrentLimitConfiguration::new(
            true,
            current_limit,
            trigger_threshold,
            trigger_duration,
        );
        self.create_talon_fx_with(id, can_bus, stator, supply)
    }

    /// Create a Talon FX with a custom stator limit (always enabled).
    ///
    /// Stator limiting bounds acceleration and motor heat.
    pub fn create_talon_fx_stator_limit(
        &mut self,
        id: i32,
        can_bus: &str,
        current_limit: f64,
        trigger_threshold: f64,
        trigger_duration: f64,
    ) -> Result<Option<D::Fx>, MotorError> {
        let stator = CurrentLimitConfiguration::new(
            true,
            current_limit,
            trigger_threshold,
            trigger_duration,
        );
        let supply = self.default_supply_limit();
        self.create_talon_fx_with(id, can_bus, stator, supply)
    }

    /// Shared body of the Talon FX constructors
    pub fn create_talon_fx_with(
        &mut self,
        id: i32,
        can_bus: &str,
        stator: CurrentLimitConfiguration,
        supply: CurrentLimitConfiguration,
    ) -> Result<Option<D::Fx>, MotorError> {
        if id == ABSENT_ID {
            debug!("TalonFX on {} not present, skipping", can_bus);
            return Ok(None);
        }

        let mut talon = self.devices.talon_fx(id, can_bus);

        if self.platform.is_real() {
            let actual = talon.firmware_version();
            check_firmware(&self.station, &self.constants.falcon, id, actual)?;
        }

        let config = self.talon_fx_config(stator, supply);
        debug!("Creating TalonFX {} on {} with {:?}", id, can_bus, config);

        self.observe(id, "configFactoryDefault", talon.config_factory_default());
        self.observe(id, "configAllSettings", talon.config_all_settings(&config));
        talon.enable_voltage_compensation(false);
        talon.set_neutral_mode(NeutralMode::Brake);
        self.observe(
            id,
            "configSelectedFeedbackSensor",
            talon.config_selected_feedback_sensor(FeedbackDevice::IntegratedSensor),
        );

        info!("TalonFX {} on {} configured", id, can_bus);
        Ok(Some(talon))
    }

    /// Driver status codes are logged and otherwise ignored
    fn observe(&self, id: i32, step: &str, status: StatusCode) {
        if !status.is_ok() {
            debug!("Controller {}: {} returned {:?}", id, step, status);
        }
    }
}
