// Talon FX firmware guard
//
// A mismatch is either fatal (reported as an error with stack trace, then
// returned as an I/O failure) or tolerated with a warning, depending on
// `FalconConstants::break_on_wrong_firmware`.

use std::io;

use crate::config::FalconConstants;
use crate::station::DriverStation;

#[derive(Debug, thiserror::Error)]
pub enum MotorError {
    #[error("{0}")]
    Io(#[from] io::Error),
}

pub fn mismatch_message(id: i32, actual: i32, required: i32) -> String {
    format!(
        "TalonFX {} firmware incorrect. Has {}, currently FalconConstants.java requires: {}",
        id, actual, required
    )
}

/// Compare a controller's firmware against the required version
pub fn check_firmware<S: DriverStation + ?Sized>(
    station: &S,
    falcon: &FalconConstants,
    id: i32,
    actual: i32,
) -> Result<(), MotorError> {
    if actual == falcon.firmware_version {
        return Ok(());
    }

    let message = mismatch_message(id, actual, falcon.firmware_version);
    if falcon.break_on_wrong_firmware {
        station.report_error(&message, true);
        return Err(io::Error::other(message).into());
    }

    station.report_warning(&format!("{}, ignoring due to user specification.", message), false);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::mock::{RecordingStation, Report};

    fn falcon(break_on_wrong_firmware: bool) -> FalconConstants {
        FalconConstants {
            break_on_wrong_firmware,
            ..FalconConstants::DEFAULT
        }
    }

    #[test]
    fn test_matching_firmware_is_silent() {
        let station = RecordingStation::default();
        let required = FalconConstants::DEFAULT.firmware_version;

        check_firmware(&station, &falcon(true), 3, required).unwrap();
        assert!(station.reports().is_empty());
    }

    #[test]
    fn test_mismatch_with_break_fails() {
        let station = RecordingStation::default();
        let required = FalconConstants::DEFAULT.firmware_version;

        let err = check_firmware(&station, &falcon(true), 3, required - 1).unwrap_err();
        let expected = mismatch_message(3, required - 1, required);

        let MotorError::Io(io_err) = &err;
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
        assert_eq!(err.to_string(), expected);
        assert_eq!(
            station.reports(),
            vec![Report::Error {
                message: expected,
                with_stack_trace: true
            }]
        );
    }

    #[test]
    fn test_mismatch_without_break_warns() {
        let station = RecordingStation::default();
        let required = FalconConstants::DEFAULT.firmware_version;

        check_firmware(&station, &falcon(false), 3, required + 7).unwrap();

        let reports = station.reports();
        assert_eq!(reports.len(), 1);
        match &reports[0] {
            Report::Warning {
                message,
                with_stack_trace,
            } => {
                assert!(!with_stack_trace);
                assert!(message.starts_with("TalonFX 3 firmware incorrect. Has "));
                assert!(message.ends_with(", ignoring due to user specification."));
            }
            other => panic!("Expected a warning, got {:?}", other),
        }
    }

    #[test]
    fn test_message_format() {
        assert_eq!(
            mismatch_message(12, 5632, 5633),
            "TalonFX 12 firmware incorrect. Has 5632, currently FalconConstants.java requires: 5633"
        );
    }
}
