//! # LIDAR-Lite v3 Range Finder Driver
//!
//! A `no_std` driver for the Garmin LIDAR-Lite v3 optical distance sensor
//! over I2C, plus a small [`Tracker`] that runs the acquire / wait / read
//! cycle and integrates the device's delta-velocity readings.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use lidar_lite::{LidarLite, Tracker, TrackerConfig};
//!
//! let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! let delay = embedded_hal_mock::eh1::delay::NoopDelay;
//! let sensor = LidarLite::new(i2c, delay);
//!
//! let mut tracker = Tracker::new(sensor, TrackerConfig::default());
//! tracker.check_healthy().unwrap();
//! loop {
//!     let reading = tracker.poll().unwrap();
//!     println!("{reading}");
//! }
//! ```
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod fmt; // <-- must be first module!

mod error;
mod register;
mod status;
mod tracker;

pub use error::{Error, Operation};
pub use register::{
    saturate_distance, Register, ACQUIRE_COMMAND, AUTO_INCREMENT, DEFAULT_ADDRESS,
    MAX_DISTANCE_CM, STATUS_BUSY_MASK, STATUS_HEALTH_MASK,
};
pub use status::Status;
pub use tracker::{Reading, Tracker, TrackerConfig};

#[cfg(not(feature = "async"))]
use embedded_hal::{delay::DelayNs, i2c::I2c};
#[cfg(feature = "async")]
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

/// LIDAR-Lite v3 driver.
///
/// Owns the I2C bus handle and a delay provider. Every operation is a
/// blocking (or, with the `async` feature, awaited) bus transaction; a
/// failed transfer is returned as [`Error::Bus`] naming the step that failed.
///
/// The device does not use repeated starts, so each register read is a
/// separate address write followed by a separate read.
pub struct LidarLite<I2C, D> {
    /// I2C interface for communication with the sensor
    i2c: I2C,
    /// 7-bit I2C address of the sensor
    address: u8,
    /// Delay used between busy polls
    delay: D,
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), keep_self),
    async(feature = "async", keep_self)
)]
impl<I2C, E, D> LidarLite<I2C, D>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
    D: DelayNs,
{
    /// Creates a new driver talking to the sensor at [`DEFAULT_ADDRESS`].
    ///
    /// No bus traffic happens until the first operation.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use lidar_lite::LidarLite;
    ///
    /// let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
    /// let delay = embedded_hal_mock::eh1::delay::NoopDelay;
    ///
    /// let mut sensor = LidarLite::new(i2c, delay);
    /// ```
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
            delay,
        }
    }

    /// Consumes the driver and hands back the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Reads and decodes the status register.
    ///
    /// # Errors
    ///
    /// * `Err(Error::Bus { operation: Operation::SelectStatus, .. })` - selecting the register failed
    /// * `Err(Error::Bus { operation: Operation::ReadStatus, .. })` - reading the byte failed
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use lidar_lite::LidarLite;
    ///
    /// let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
    /// let delay = embedded_hal_mock::eh1::delay::NoopDelay;
    /// let mut sensor = LidarLite::new(i2c, delay);
    ///
    /// let status = sensor.read_status().unwrap();
    /// if status.busy {
    ///     println!("measurement in progress");
    /// }
    /// ```
    pub async fn read_status(&mut self) -> Result<Status, Error<E>> {
        let mut buf = [0u8; 1];
        self.read_register(
            Register::Status.into(),
            &mut buf,
            Operation::SelectStatus,
            Operation::ReadStatus,
        )
        .await?;
        let status = Status::from_byte(buf[0]);
        trace!(
            "status {:#x}: busy={} healthy={}",
            status.raw,
            status.busy,
            status.healthy
        );
        Ok(status)
    }

    /// Reads the status register and fails if the health flag is clear.
    ///
    /// Meant as a pre-flight check before starting to poll; the measurement
    /// cycle itself never looks at the health flag.
    ///
    /// # Errors
    ///
    /// * `Err(Error::Unhealthy(status))` - the device reports a failed self-check
    /// * `Err(Error::Bus { .. })` - the status read failed
    pub async fn check_healthy(&mut self) -> Result<Status, Error<E>> {
        let status = self.read_status().await?;
        if status.healthy {
            Ok(status)
        } else {
            warn!("sensor is not healthy, status {:#x}", status.raw);
            Err(Error::Unhealthy(status))
        }
    }

    /// Starts a distance (and velocity) acquisition.
    ///
    /// Writes [`ACQUIRE_COMMAND`] to [`Register::AcqCommand`] in a single
    /// two-byte transfer.
    ///
    /// # Errors
    ///
    /// * `Err(Error::Bus { operation: Operation::WriteAcqCommand, .. })` - the write failed
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use lidar_lite::LidarLite;
    ///
    /// let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
    /// let delay = embedded_hal_mock::eh1::delay::NoopDelay;
    /// let mut sensor = LidarLite::new(i2c, delay);
    ///
    /// sensor.trigger_acquisition().unwrap();
    /// let status = sensor.wait_until_idle(500, Some(100)).unwrap();
    /// let distance = sensor.read_distance().unwrap();
    /// ```
    pub async fn trigger_acquisition(&mut self) -> Result<(), Error<E>> {
        let buffer = [Register::AcqCommand.into(), ACQUIRE_COMMAND];
        self.i2c
            .write(self.address, &buffer)
            .await
            .map_err(Error::bus(Operation::WriteAcqCommand))
    }

    /// Polls the status register until the busy flag clears.
    ///
    /// The delay of `interval_ms` follows every status read, including the
    /// last one. With `max_polls` set, gives up with [`Error::Timeout`] after
    /// that many reads all reported busy (`Some(0)` is treated as one read).
    /// With `None` the wait is unbounded.
    ///
    /// # Returns
    ///
    /// * `Ok(Status)` - The first status read that reported not busy
    ///
    /// # Errors
    ///
    /// * `Err(Error::Timeout { polls })` - still busy after `max_polls` reads
    /// * `Err(Error::Bus { .. })` - a status read failed
    pub async fn wait_until_idle(
        &mut self,
        interval_ms: u32,
        max_polls: Option<u32>,
    ) -> Result<Status, Error<E>> {
        let mut polls = 0u32;
        loop {
            let status = self.read_status().await?;
            self.delay.delay_ms(interval_ms).await;
            polls = polls.saturating_add(1);

            if !status.busy {
                debug!("sensor idle after {} status reads", polls);
                break Ok(status);
            }

            if let Some(max) = max_polls {
                if polls >= max.max(1) {
                    break Err(Error::Timeout { polls });
                }
            }
        }
    }

    /// Reads the raw distance in centimeters.
    ///
    /// Both distance registers are fetched in one auto-increment burst and
    /// joined big-endian (`high << 8 | low`). The value is not saturated;
    /// apply [`saturate_distance`] before reporting it.
    ///
    /// # Errors
    ///
    /// * `Err(Error::Bus { operation: Operation::SelectDistance, .. })` - selecting the registers failed
    /// * `Err(Error::Bus { operation: Operation::ReadDistance, .. })` - reading the bytes failed
    pub async fn read_distance(&mut self) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.read_register(
            Register::FullDelayHigh.burst(),
            &mut buf,
            Operation::SelectDistance,
            Operation::ReadDistance,
        )
        .await?;
        let distance = u16::from_be_bytes(buf);
        debug!("distance raw {} cm", distance);
        Ok(distance)
    }

    /// Reads the signed velocity change since the previous measurement, in
    /// centimeters per second.
    ///
    /// # Errors
    ///
    /// * `Err(Error::Bus { operation: Operation::SelectDeltaVelocity, .. })` - selecting the register failed
    /// * `Err(Error::Bus { operation: Operation::ReadDeltaVelocity, .. })` - reading the byte failed
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use lidar_lite::LidarLite;
    ///
    /// let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
    /// let delay = embedded_hal_mock::eh1::delay::NoopDelay;
    /// let mut sensor = LidarLite::new(i2c, delay);
    ///
    /// let mut velocity = 0i32;
    /// velocity += i32::from(sensor.read_delta_velocity().unwrap());
    /// ```
    pub async fn read_delta_velocity(&mut self) -> Result<i8, Error<E>> {
        let mut buf = [0u8; 1];
        self.read_register(
            Register::DeltaVelocity.into(),
            &mut buf,
            Operation::SelectDeltaVelocity,
            Operation::ReadDeltaVelocity,
        )
        .await?;
        let delta = i8::from_be_bytes(buf);
        debug!("delta velocity {} cm/s", delta);
        Ok(delta)
    }

    async fn read_register(
        &mut self,
        register_address: u8,
        buf: &mut [u8],
        select: Operation,
        read: Operation,
    ) -> Result<(), Error<E>> {
        self.i2c
            .write(self.address, &[register_address])
            .await
            .map_err(Error::bus(select))?;
        self.i2c
            .read(self.address, buf)
            .await
            .map_err(Error::bus(read))
    }
}
