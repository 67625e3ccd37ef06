use core::fmt;

#[cfg(not(feature = "async"))]
use embedded_hal::{delay::DelayNs, i2c::I2c};
#[cfg(feature = "async")]
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

use crate::{saturate_distance, Error, LidarLite, Status};

/// Timing of the busy-wait inside each measurement cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackerConfig {
    /// Delay after each status read while waiting for the device, in ms
    pub busy_poll_interval_ms: u32,
    /// Give up after this many busy status reads; `None` waits forever
    pub max_busy_polls: Option<u32>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            busy_poll_interval_ms: 500,
            max_busy_polls: Some(100),
        }
    }
}

/// Result of one complete measurement cycle.
///
/// `Display` renders the report line, e.g.
/// `lidar: distance=123 cm, velocity=-4 cm/s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Distance in centimeters, saturated to [`crate::MAX_DISTANCE_CM`]
    pub distance_cm: u16,
    /// Velocity change reported by the device this cycle, in cm/s
    pub delta_velocity: i8,
    /// Sum of every delta velocity read so far, in cm/s
    pub velocity_cm_s: i32,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lidar: distance={} cm, velocity={} cm/s",
            self.distance_cm, self.velocity_cm_s
        )
    }
}

/// Runs the measurement cycle and keeps the running velocity.
///
/// Each [`poll`](Self::poll) goes through acquire, wait-until-idle and read,
/// in that order. The velocity accumulator starts at zero, is never reset,
/// and only changes after both the distance and the delta velocity of a
/// cycle were read successfully. It wraps on overflow.
pub struct Tracker<I2C, D> {
    sensor: LidarLite<I2C, D>,
    config: TrackerConfig,
    velocity: i32,
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), keep_self),
    async(feature = "async", keep_self)
)]
impl<I2C, E, D> Tracker<I2C, D>
where
    I2C: I2c<Error = E>,
    E: fmt::Debug,
    D: DelayNs,
{
    /// Wraps a driver. No bus traffic happens here.
    pub fn new(sensor: LidarLite<I2C, D>, config: TrackerConfig) -> Self {
        Self {
            sensor,
            config,
            velocity: 0,
        }
    }

    /// Accumulated velocity in cm/s.
    #[must_use]
    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    /// Returns the driver, dropping the accumulated velocity.
    pub fn into_inner(self) -> LidarLite<I2C, D> {
        self.sensor
    }

    /// Optional pre-flight check, see [`LidarLite::check_healthy`].
    ///
    /// # Errors
    ///
    /// * `Err(Error::Unhealthy(status))` - the device reports a failed self-check
    /// * `Err(Error::Bus { .. })` - the status read failed
    pub async fn check_healthy(&mut self) -> Result<Status, Error<E>> {
        info!("checking sensor health");
        self.sensor.check_healthy().await
    }

    /// Runs one full measurement cycle.
    ///
    /// # Errors
    ///
    /// Any bus failure, or [`Error::Timeout`] when the device stays busy
    /// longer than [`TrackerConfig::max_busy_polls`] allows. The velocity
    /// accumulator is left untouched on error.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use lidar_lite::{LidarLite, Tracker, TrackerConfig};
    ///
    /// let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
    /// let delay = embedded_hal_mock::eh1::delay::NoopDelay;
    /// let config = TrackerConfig { busy_poll_interval_ms: 20, max_busy_polls: None };
    /// let mut tracker = Tracker::new(LidarLite::new(i2c, delay), config);
    ///
    /// let reading = tracker.poll().unwrap();
    /// assert_eq!(reading.velocity_cm_s, tracker.velocity());
    /// ```
    pub async fn poll(&mut self) -> Result<Reading, Error<E>> {
        self.sensor.trigger_acquisition().await?;
        self.sensor
            .wait_until_idle(self.config.busy_poll_interval_ms, self.config.max_busy_polls)
            .await?;

        let distance_cm = saturate_distance(self.sensor.read_distance().await?);
        let delta_velocity = self.sensor.read_delta_velocity().await?;
        self.velocity = self.velocity.wrapping_add(i32::from(delta_velocity));

        Ok(Reading {
            distance_cm,
            delta_velocity,
            velocity_cm_s: self.velocity,
        })
    }
}
