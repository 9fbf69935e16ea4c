// Recording test doubles for the driver and driver station seams

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::device::*;
use crate::config::FalconConstants;
use crate::station::DriverStation;

/// One observed driver interaction, in call order across all handles
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    OpenSrx { id: i32 },
    OpenSpark { id: i32, motor_type: MotorType },
    OpenFx { id: i32, can_bus: String },

    FirmwareVersion,
    ConfigFactoryDefault,
    ConfigSrx(TalonSrxConfiguration),
    ConfigFx(TalonFxConfiguration),
    EnableCurrentLimit(bool),
    EnableVoltageCompensation(bool),
    SetNeutralMode(NeutralMode),
    SelectFeedbackSensor(FeedbackDevice),

    RestoreFactoryDefaults,
    SparkVoltageCompensation(f64),
    SetSmartCurrentLimit(u32),
    SetIdleMode(IdleMode),
    BurnFlash,
}

/// Driver steps that can be made to report an error status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    FactoryDefault,
    ConfigAll,
    VoltageCompensation,
    SmartCurrentLimit,
    IdleMode,
    BurnFlash,
    FeedbackSensor,
}

type CallLog = Rc<RefCell<Vec<Call>>>;

pub struct MockDevices {
    log: CallLog,
    firmware_version: i32,
    failing: Rc<HashSet<Step>>,
}

impl MockDevices {
    /// Devices that all report the required firmware
    pub fn new() -> Self {
        Self::with_firmware(FalconConstants::DEFAULT.firmware_version)
    }

    pub fn with_firmware(firmware_version: i32) -> Self {
        Self {
            log: CallLog::default(),
            firmware_version,
            failing: Rc::default(),
        }
    }

    /// Devices whose handles return an error status for `steps`
    pub fn failing(steps: &[Step]) -> Self {
        Self {
            failing: Rc::new(steps.iter().copied().collect()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }
}

/// Handle shared by all three families; it records into the provider's log
#[derive(Debug)]
pub struct MockHandle {
    pub id: i32,
    log: CallLog,
    firmware_version: i32,
    failing: Rc<HashSet<Step>>,
}

impl MockHandle {
    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn step(&self, step: Step, call: Call) -> StatusCode {
        self.record(call);
        if self.failing.contains(&step) {
            StatusCode::Error(-1)
        } else {
            StatusCode::Ok
        }
    }
}

impl DeviceProvider for MockDevices {
    type Srx = MockHandle;
    type Spark = MockHandle;
    type Fx = MockHandle;

    fn talon_srx(&mut self, id: i32) -> MockHandle {
        self.log.borrow_mut().push(Call::OpenSrx { id });
        self.handle(id)
    }

    fn spark_max(&mut self, id: i32, motor_type: MotorType) -> MockHandle {
        self.log.borrow_mut().push(Call::OpenSpark { id, motor_type });
        self.handle(id)
    }

    fn talon_fx(&mut self, id: i32, can_bus: &str) -> MockHandle {
        self.log.borrow_mut().push(Call::OpenFx {
            id,
            can_bus: can_bus.to_string(),
        });
        self.handle(id)
    }
}

impl MockDevices {
    fn handle(&self, id: i32) -> MockHandle {
        MockHandle {
            id,
            log: Rc::clone(&self.log),
            firmware_version: self.firmware_version,
            failing: Rc::clone(&self.failing),
        }
    }
}

impl TalonSrx for MockHandle {
    fn config_factory_default(&mut self) -> StatusCode {
        self.step(Step::FactoryDefault, Call::ConfigFactoryDefault)
    }

    fn config_all_settings(&mut self, config: &TalonSrxConfiguration) -> StatusCode {
        self.step(Step::ConfigAll, Call::ConfigSrx(*config))
    }

    fn enable_current_limit(&mut self, enable: bool) {
        self.record(Call::EnableCurrentLimit(enable));
    }

    fn enable_voltage_compensation(&mut self, enable: bool) {
        self.record(Call::EnableVoltageCompensation(enable));
    }

    fn set_neutral_mode(&mut self, mode: NeutralMode) {
        self.record(Call::SetNeutralMode(mode));
    }
}

impl SparkMax for MockHandle {
    fn restore_factory_defaults(&mut self) -> StatusCode {
        self.step(Step::FactoryDefault, Call::RestoreFactoryDefaults)
    }

    fn enable_voltage_compensation(&mut self, nominal_voltage: f64) -> StatusCode {
        self.step(Step::VoltageCompensation, Call::SparkVoltageCompensation(nominal_voltage))
    }

    fn set_smart_current_limit(&mut self, stall_limit: u32) -> StatusCode {
        self.step(Step::SmartCurrentLimit, Call::SetSmartCurrentLimit(stall_limit))
    }

    fn set_idle_mode(&mut self, mode: IdleMode) -> StatusCode {
        self.step(Step::IdleMode, Call::SetIdleMode(mode))
    }

    fn burn_flash(&mut self) -> StatusCode {
        self.step(Step::BurnFlash, Call::BurnFlash)
    }
}

impl TalonFx for MockHandle {
    fn firmware_version(&mut self) -> i32 {
        self.record(Call::FirmwareVersion);
        self.firmware_version
    }

    fn config_factory_default(&mut self) -> StatusCode {
        self.step(Step::FactoryDefault, Call::ConfigFactoryDefault)
    }

    fn config_all_settings(&mut self, config: &TalonFxConfiguration) -> StatusCode {
        self.step(Step::ConfigAll, Call::ConfigFx(*config))
    }

    fn enable_voltage_compensation(&mut self, enable: bool) {
        self.record(Call::EnableVoltageCompensation(enable));
    }

    fn set_neutral_mode(&mut self, mode: NeutralMode) {
        self.record(Call::SetNeutralMode(mode));
    }

    fn config_selected_feedback_sensor(&mut self, device: FeedbackDevice) -> StatusCode {
        self.step(Step::FeedbackSensor, Call::SelectFeedbackSensor(device))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Error { message: String, with_stack_trace: bool },
    Warning { message: String, with_stack_trace: bool },
}

#[derive(Debug, Default)]
pub struct RecordingStation {
    reports: RefCell<Vec<Report>>,
}

impl RecordingStation {
    pub fn reports(&self) -> Vec<Report> {
        self.reports.borrow().clone()
    }
}

impl DriverStation for RecordingStation {
    fn report_error(&self, message: &str, with_stack_trace: bool) {
        self.reports.borrow_mut().push(Report::Error {
            message: message.to_string(),
            with_stack_trace,
        });
    }

    fn report_warning(&self, message: &str, with_stack_trace: bool) {
        self.reports.borrow_mut().push(Report::Warning {
            message: message.to_string(),
            with_stack_trace,
        });
    }
}
