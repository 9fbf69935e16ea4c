use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use robot_motor_factory::config::RobotConstants;
use robot_motor_factory::field::FieldLayout;
use robot_motor_factory::motor::{
    DeviceProvider, FeedbackDevice, IdleMode, MotorFactory, MotorType, NeutralMode, SparkMax,
    StatusCode, TalonFx, TalonFxConfiguration, TalonSrx, TalonSrxConfiguration,
};
use robot_motor_factory::station::{RuntimeKind, TracingDriverStation};

/// Inspect the robot's motor controller defaults and field landmarks
#[derive(Parser)]
#[command(name = "motor-factory", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the AprilTag field layout as JSON
    Landmarks {
        /// Field layout file; the built-in table is used if missing or invalid
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Print the configuration each default motor constructor applies
    Defaults {
        /// JSON file overriding robot constants
        #[arg(long)]
        constants: Option<PathBuf>,
    },
}

/// Settings a Talon ends up with, as seen from its driver
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
struct TalonDefaults<C> {
    config: Option<C>,
    voltage_compensation_enabled: Option<bool>,
    neutral_mode: Option<NeutralMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_limit_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback_device: Option<FeedbackDevice>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
struct SparkMaxDefaults {
    nominal_voltage: Option<f64>,
    smart_current_limit: Option<u32>,
    idle_mode: Option<IdleMode>,
    burn_flash: bool,
}

// Driver handles that only remember what the factory applied to them

struct DryRunSrx(TalonDefaults<TalonSrxConfiguration>);
struct DryRunSpark(SparkMaxDefaults);
struct DryRunFx(TalonDefaults<TalonFxConfiguration>);

impl TalonSrx for DryRunSrx {
    fn config_factory_default(&mut self) -> StatusCode {
        self.0 = TalonDefaults::default();
        StatusCode::Ok
    }

    fn config_all_settings(&mut self, config: &TalonSrxConfiguration) -> StatusCode {
        self.0.config = Some(*config);
        StatusCode::Ok
    }

    fn enable_current_limit(&mut self, enable: bool) {
        self.0.current_limit_enabled = Some(enable);
    }

    fn enable_voltage_compensation(&mut self, enable: bool) {
        self.0.voltage_compensation_enabled = Some(enable);
    }

    fn set_neutral_mode(&mut self, mode: NeutralMode) {
        self.0.neutral_mode = Some(mode);
    }
}

impl SparkMax for DryRunSpark {
    fn restore_factory_defaults(&mut self) -> StatusCode {
        self.0 = SparkMaxDefaults::default();
        StatusCode::Ok
    }

    fn enable_voltage_compensation(&mut self, nominal_voltage: f64) -> StatusCode {
        self.0.nominal_voltage = Some(nominal_voltage);
        StatusCode::Ok
    }

    fn set_smart_current_limit(&mut self, stall_limit: u32) -> StatusCode {
        self.0.smart_current_limit = Some(stall_limit);
        StatusCode::Ok
    }

    fn set_idle_mode(&mut self, mode: IdleMode) -> StatusCode {
        self.0.idle_mode = Some(mode);
        StatusCode::Ok
    }

    fn burn_flash(&mut self) -> StatusCode {
        self.0.burn_flash = true;
        StatusCode::Ok
    }
}

impl TalonFx for DryRunFx {
    fn firmware_version(&mut self) -> i32 {
        0
    }

    fn config_factory_default(&mut self) -> StatusCode {
        self.0 = TalonDefaults::default();
        StatusCode::Ok
    }

    fn config_all_settings(&mut self, config: &TalonFxConfiguration) -> StatusCode {
        self.0.config = Some(*config);
        StatusCode::Ok
    }

    fn enable_voltage_compensation(&mut self, enable: bool) {
        self.0.voltage_compensation_enabled = Some(enable);
    }

    fn set_neutral_mode(&mut self, mode: NeutralMode) {
        self.0.neutral_mode = Some(mode);
    }

    fn config_selected_feedback_sensor(&mut self, device: FeedbackDevice) -> StatusCode {
        self.0.feedback_device = Some(device);
        StatusCode::Ok
    }
}

struct DryRun;

impl DeviceProvider for DryRun {
    type Srx = DryRunSrx;
    type Spark = DryRunSpark;
    type Fx = DryRunFx;

    fn talon_srx(&mut self, _id: i32) -> DryRunSrx {
        DryRunSrx(TalonDefaults::default())
    }

    fn spark_max(&mut self, _id: i32, _motor_type: MotorType) -> DryRunSpark {
        DryRunSpark(SparkMaxDefaults::default())
    }

    fn talon_fx(&mut self, _id: i32, _can_bus: &str) -> DryRunFx {
        DryRunFx(TalonDefaults::default())
    }
}

// Simulation skips the firmware read, there is no controller to ask
type DryRunFactory = MotorFactory<DryRun, TracingDriverStation, RuntimeKind>;

fn dry_run_factory(constants: RobotConstants) -> DryRunFactory {
    MotorFactory::with_parts(DryRun, TracingDriverStation, RuntimeKind::Simulation, constants)
}

#[derive(Debug, PartialEq, Serialize)]
struct Defaults {
    talon_srx: TalonDefaults<TalonSrxConfiguration>,
    spark_max: SparkMaxDefaults,
    talon_fx: TalonDefaults<TalonFxConfiguration>,
    required_talon_fx_firmware: i32,
    break_on_wrong_firmware: bool,
}

impl Defaults {
    /// Run each default constructor and capture what it applied
    fn from_constants(
        constants: &RobotConstants,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut factory = dry_run_factory(*constants);

        let talon_srx = factory.create_talon_srx_default(0).0;
        let spark_max = factory.create_spark_max_default(0, MotorType::Brushless).0;
        let talon_fx = factory
            .create_talon_fx(0, "rio")?
            .map(|talon| talon.0)
            .unwrap_or_default();

        Ok(Self {
            talon_srx,
            spark_max,
            talon_fx,
            required_talon_fx_firmware: constants.falcon.firmware_version,
            break_on_wrong_firmware: constants.falcon.break_on_wrong_firmware,
        })
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json = match cli.command {
        Command::Landmarks { layout } => {
            let layout = match layout {
                Some(path) => FieldLayout::load_or_fallback(path),
                None => FieldLayout::fallback(),
            };
            info!("Field layout has {} tags", layout.tags.len());
            serde_json::to_string_pretty(&layout)?
        }
        Command::Defaults { constants } => {
            let constants = match constants {
                Some(path) => RobotConstants::from_json_file(path)?,
                None => RobotConstants::DEFAULT,
            };
            serde_json::to_string_pretty(&Defaults::from_constants(&constants)?)?
        }
    };

    println!("{}", json);
    Ok(())
}

fn main() {
    // Logs go to stderr so stdout stays valid JSON (set RUST_LOG=debug for more)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
