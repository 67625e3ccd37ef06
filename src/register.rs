//! Register map and fixed device constants.

/// Default 7-bit I2C address of the LIDAR-Lite v3.
///
/// The read/write direction bit is added by the I2C implementation.
pub const DEFAULT_ADDRESS: u8 = 0x62;

/// Value written to [`Register::AcqCommand`] to take a distance measurement
/// with receiver bias correction.
pub const ACQUIRE_COMMAND: u8 = 0x04;

/// Setting this bit on a register address makes the device auto-increment
/// the address, so consecutive registers can be read in one transfer.
pub const AUTO_INCREMENT: u8 = 0x80;

/// Busy flag in [`Register::Status`] (bit 0).
pub const STATUS_BUSY_MASK: u8 = 0x01;

/// Health flag in [`Register::Status`] (bit 5).
pub const STATUS_HEALTH_MASK: u8 = 0x20;

/// Largest distance reported, in centimeters.
///
/// Raw readings at or above this value mean "no target in range" and are
/// saturated to it.
pub const MAX_DISTANCE_CM: u16 = 9999;

/// Register addresses used by the driver.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Device command register (0x00)
    AcqCommand = 0x00,
    /// System status register (0x01)
    Status = 0x01,
    /// Signed velocity change since the previous measurement (0x09)
    DeltaVelocity = 0x09,
    /// Distance measurement, high byte (0x0F)
    FullDelayHigh = 0x0F,
    /// Distance measurement, low byte (0x10)
    FullDelayLow = 0x10,
}

impl Register {
    /// Address to select when reading this register and the next one in a
    /// single transfer.
    #[must_use]
    pub const fn burst(self) -> u8 {
        self as u8 | AUTO_INCREMENT
    }
}

impl From<Register> for u8 {
    fn from(r: Register) -> Self {
        r as u8
    }
}

/// Saturates a raw distance reading to [`MAX_DISTANCE_CM`].
#[must_use]
pub const fn saturate_distance(raw: u16) -> u16 {
    if raw >= MAX_DISTANCE_CM {
        MAX_DISTANCE_CM
    } else {
        raw
    }
}
