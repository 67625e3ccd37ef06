use clap::Parser;
use lidar_lite::TrackerConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// I2C character device the LIDAR-Lite is connected to.
    #[arg(long, env = "LIDAR_BUS", default_value = "/dev/i2c-1")]
    pub bus: String,

    /// Delay after each status read while the sensor is busy, in milliseconds.
    #[arg(long, env = "LIDAR_INTERVAL_MS", default_value = "500")]
    pub interval_ms: u32,

    /// Abort when the sensor is still busy after this many status reads.
    /// Use 0 to wait forever.
    #[arg(long, env = "LIDAR_MAX_BUSY_POLLS", default_value = "100")]
    pub max_busy_polls: u32,

    /// Start polling without checking the sensor health flag first.
    #[arg(long, env = "LIDAR_SKIP_HEALTH_CHECK")]
    pub skip_health_check: bool,
}

impl Args {
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            busy_poll_interval_ms: self.interval_ms,
            max_busy_polls: (self.max_busy_polls != 0).then_some(self.max_busy_polls),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["lidar-poll"]);
        assert_eq!(args.bus, "/dev/i2c-1");
        assert!(!args.skip_health_check);
        assert_eq!(args.tracker_config(), TrackerConfig::default());
    }

    #[test]
    fn zero_busy_polls_waits_forever() {
        let args = Args::parse_from(["lidar-poll", "--max-busy-polls", "0", "--interval-ms", "50"]);
        let config = args.tracker_config();
        assert_eq!(config.max_busy_polls, None);
        assert_eq!(config.busy_poll_interval_ms, 50);
    }
}
