// Driver station reporting and platform detection seams
//
// The motor factory reports firmware problems through `DriverStation` and
// asks `Platform` whether it is talking to real hardware. Robots plug in
// their own implementations; the defaults here log through tracing.

use std::backtrace::Backtrace;

use tracing::{error, warn};

/// Sink for messages shown to the drive team
pub trait DriverStation {
    fn report_error(&self, message: &str, with_stack_trace: bool);

    fn report_warning(&self, message: &str, with_stack_trace: bool);
}

/// Reports to the log instead of a driver station console
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDriverStation;

impl DriverStation for TracingDriverStation {
    fn report_error(&self, message: &str, with_stack_trace: bool) {
        if with_stack_trace {
            error!("{}\n{}", message, Backtrace::force_capture());
        } else {
            error!("{}", message);
        }
    }

    fn report_warning(&self, message: &str, with_stack_trace: bool) {
        if with_stack_trace {
            warn!("{}\n{}", message, Backtrace::force_capture());
        } else {
            warn!("{}", message);
        }
    }
}

pub trait Platform {
    /// True when running against physical controllers rather than a simulator
    fn is_real(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeKind {
    #[default]
    Real,
    Simulation,
}

impl Platform for RuntimeKind {
    fn is_real(&self) -> bool {
        matches!(self, RuntimeKind::Real)
    }
}
