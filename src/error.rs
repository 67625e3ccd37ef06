use core::fmt;

use crate::status::Status;

/// The bus step that was in progress when an I2C transfer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Writing the status register address
    SelectStatus,
    /// Reading the status byte
    ReadStatus,
    /// Writing the acquire command
    WriteAcqCommand,
    /// Writing the distance register burst address
    SelectDistance,
    /// Reading the two distance bytes
    ReadDistance,
    /// Writing the delta velocity register address
    SelectDeltaVelocity,
    /// Reading the delta velocity byte
    ReadDeltaVelocity,
}

impl Operation {
    /// Short diagnostic text, prefixed with the driver routine name.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Operation::SelectStatus => "read_status: failed to select status register for read",
            Operation::ReadStatus => "read_status: failed to read status register",
            Operation::WriteAcqCommand => "write_acq_cmd: failed to write acquire command",
            Operation::SelectDistance => {
                "read_distance: failed to select distance registers for read"
            }
            Operation::ReadDistance => "read_distance: failed to read distance registers",
            Operation::SelectDeltaVelocity => {
                "read_delta_velocity: failed to select delta velocity register for read"
            }
            Operation::ReadDeltaVelocity => {
                "read_delta_velocity: failed to read delta velocity register"
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Error type for LIDAR-Lite operations.
///
/// Nothing here is retried by the driver: every variant is meant to be
/// handed back to the caller, which decides whether to stop.
///
/// # Examples
///
/// ```rust,no_run
/// use lidar_lite::{Error, LidarLite};
///
/// let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// let delay = embedded_hal_mock::eh1::delay::NoopDelay;
/// let mut sensor = LidarLite::new(i2c, delay);
///
/// match sensor.check_healthy() {
///     Ok(status) => println!("status byte {:#04x}", status.raw),
///     Err(Error::Unhealthy(status)) => println!("self-check failed: {:#04x}", status.raw),
///     Err(e) => println!("lidar: {e}"),
/// }
/// ```
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E: fmt::Debug> {
    /// I2C transfer failed
    Bus {
        /// Step that failed
        operation: Operation,
        /// Error reported by the I2C implementation
        source: E,
    },
    /// Status register reports a failed self-check
    Unhealthy(Status),
    /// Device stayed busy for the whole poll budget
    Timeout {
        /// Number of status reads that all reported busy
        polls: u32,
    },
}

impl<E: fmt::Debug> Error<E> {
    pub(crate) fn bus(operation: Operation) -> impl FnOnce(E) -> Self {
        move |source| Error::Bus { operation, source }
    }

    /// The failed bus step, if this is a bus error.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::Bus { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus { operation, source } => write!(f, "{operation}: {source:?}"),
            Error::Unhealthy(status) => {
                write!(f, "sensor is not healthy (status {:#04x})", status.raw)
            }
            Error::Timeout { polls } => {
                write!(f, "wait_busy: sensor still busy after {polls} status reads")
            }
        }
    }
}
