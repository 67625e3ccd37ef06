use crate::register::{STATUS_BUSY_MASK, STATUS_HEALTH_MASK};

/// Decoded contents of the status register.
///
/// Read fresh on every poll; a stored `Status` says nothing about the device
/// once another command has been issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// A measurement is in progress.
    pub busy: bool,
    /// Reference and receiver bias passed the device self-check.
    pub healthy: bool,
    /// Status byte as read from the device.
    pub raw: u8,
}

impl Status {
    /// Decodes a status register byte.
    ///
    /// The health flag is taken as `(raw & STATUS_HEALTH_MASK) >> 5`, i.e.
    /// bit 5 alone. Firmware derived from the vendor sample multiplied the
    /// byte by the mask instead, which reports "healthy" for any nonzero
    /// byte; that arithmetic is not reproduced here.
    #[must_use]
    pub const fn from_byte(raw: u8) -> Self {
        Self {
            busy: raw & STATUS_BUSY_MASK != 0,
            healthy: (raw & STATUS_HEALTH_MASK) >> 5 != 0,
            raw,
        }
    }
}

impl From<u8> for Status {
    fn from(raw: u8) -> Self {
        Self::from_byte(raw)
    }
}
