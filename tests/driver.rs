#![cfg(not(feature = "async"))]

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::{CheckedDelay, NoopDelay, Transaction as DelayTransaction};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
use lidar_lite::{Error, LidarLite, Operation, DEFAULT_ADDRESS};

const ADDR: u8 = DEFAULT_ADDRESS;

fn sensor(expectations: &[Transaction]) -> (LidarLite<I2cMock, NoopDelay>, I2cMock) {
    let i2c = I2cMock::new(expectations);
    (LidarLite::new(i2c.clone(), NoopDelay), i2c)
}

fn status_read(byte: u8) -> [Transaction; 2] {
    [
        Transaction::write(ADDR, vec![0x01]),
        Transaction::read(ADDR, vec![byte]),
    ]
}

#[test]
fn read_status_selects_then_reads() {
    let (mut sensor, mut i2c) = sensor(&status_read(0x21));

    let status = sensor.read_status().unwrap();
    assert!(status.busy);
    assert!(status.healthy);
    assert_eq!(status.raw, 0x21);

    i2c.done();
}

#[test]
fn read_status_select_failure_skips_read() {
    let (mut sensor, mut i2c) =
        sensor(&[Transaction::write(ADDR, vec![0x01]).with_error(ErrorKind::Other)]);

    let err = sensor.read_status().unwrap_err();
    assert_eq!(err.operation(), Some(Operation::SelectStatus));
    assert!(err.to_string().starts_with("read_status: failed to select status register"));

    i2c.done();
}

#[test]
fn read_status_read_failure() {
    let (mut sensor, mut i2c) = sensor(&[
        Transaction::write(ADDR, vec![0x01]),
        Transaction::read(ADDR, vec![0x00]).with_error(ErrorKind::Other),
    ]);

    let err = sensor.read_status().unwrap_err();
    assert_eq!(err.operation(), Some(Operation::ReadStatus));

    i2c.done();
}

#[test]
fn check_healthy_passes_with_health_bit() {
    let (mut sensor, mut i2c) = sensor(&status_read(0x20));

    let status = sensor.check_healthy().unwrap();
    assert!(status.healthy);

    i2c.done();
}

#[test]
fn check_healthy_rejects_clear_health_bit() {
    // any nonzero byte without bit 5 is still unhealthy
    let (mut sensor, mut i2c) = sensor(&status_read(0x01));

    match sensor.check_healthy() {
        Err(Error::Unhealthy(status)) => assert_eq!(status.raw, 0x01),
        other => panic!("expected unhealthy, got {other:?}"),
    }

    i2c.done();
}

#[test]
fn trigger_acquisition_writes_command_pair() {
    let (mut sensor, mut i2c) = sensor(&[Transaction::write(ADDR, vec![0x00, 0x04])]);

    sensor.trigger_acquisition().unwrap();

    i2c.done();
}

#[test]
fn trigger_acquisition_failure_names_the_step() {
    let (mut sensor, mut i2c) =
        sensor(&[Transaction::write(ADDR, vec![0x00, 0x04]).with_error(ErrorKind::Other)]);

    let err = sensor.trigger_acquisition().unwrap_err();
    assert!(matches!(
        err,
        Error::Bus {
            operation: Operation::WriteAcqCommand,
            source: ErrorKind::Other
        }
    ));
    let message = err.to_string();
    assert!(message.contains("write_acq_cmd"), "{message}");
    assert!(message.contains("failed to write acquire command"), "{message}");

    i2c.done();
}

#[test]
fn read_distance_uses_burst_address() {
    let (mut sensor, mut i2c) = sensor(&[
        Transaction::write(ADDR, vec![0x8F]),
        Transaction::read(ADDR, vec![0x01, 0x2C]),
    ]);

    assert_eq!(sensor.read_distance().unwrap(), 300);

    i2c.done();
}

#[test]
fn read_distance_is_not_saturated() {
    let (mut sensor, mut i2c) = sensor(&[
        Transaction::write(ADDR, vec![0x8F]),
        Transaction::read(ADDR, vec![0x27, 0x10]),
    ]);

    assert_eq!(sensor.read_distance().unwrap(), 10_000);

    i2c.done();
}

#[test]
fn read_distance_read_failure() {
    let (mut sensor, mut i2c) = sensor(&[
        Transaction::write(ADDR, vec![0x8F]),
        Transaction::read(ADDR, vec![0x00, 0x00]).with_error(ErrorKind::Other),
    ]);

    let err = sensor.read_distance().unwrap_err();
    assert_eq!(err.operation(), Some(Operation::ReadDistance));

    i2c.done();
}

#[test]
fn read_delta_velocity_is_twos_complement() {
    let mut expectations = Vec::new();
    for byte in [0xFF, 0x7F, 0x80, 0x05] {
        expectations.push(Transaction::write(ADDR, vec![0x09]));
        expectations.push(Transaction::read(ADDR, vec![byte]));
    }
    let (mut sensor, mut i2c) = sensor(&expectations);

    assert_eq!(sensor.read_delta_velocity().unwrap(), -1);
    assert_eq!(sensor.read_delta_velocity().unwrap(), 127);
    assert_eq!(sensor.read_delta_velocity().unwrap(), -128);
    assert_eq!(sensor.read_delta_velocity().unwrap(), 5);

    i2c.done();
}

#[test]
fn wait_until_idle_polls_while_busy() {
    let mut expectations = Vec::new();
    expectations.extend(status_read(0x21));
    expectations.extend(status_read(0x21));
    expectations.extend(status_read(0x20));
    let (mut sensor, mut i2c) = sensor(&expectations);

    let status = sensor.wait_until_idle(500, None).unwrap();
    assert!(!status.busy);

    i2c.done();
}

#[test]
fn wait_until_idle_times_out() {
    let mut expectations = Vec::new();
    for _ in 0..3 {
        expectations.extend(status_read(0x01));
    }
    let (mut sensor, mut i2c) = sensor(&expectations);

    match sensor.wait_until_idle(500, Some(3)) {
        Err(Error::Timeout { polls }) => assert_eq!(polls, 3),
        other => panic!("expected timeout, got {other:?}"),
    }

    i2c.done();
}

#[test]
fn zero_poll_limit_still_reads_once() {
    let (mut sensor, mut i2c) = sensor(&status_read(0x01));

    assert!(matches!(
        sensor.wait_until_idle(0, Some(0)),
        Err(Error::Timeout { polls: 1 })
    ));

    i2c.done();
}

#[test]
fn release_returns_the_bus() {
    let (sensor, _) = sensor(&status_read(0x00));

    let (mut i2c, _delay) = sensor.release();
    let mut driver = LidarLite::new(i2c.clone(), NoopDelay);
    assert!(!driver.read_status().unwrap().busy);

    i2c.done();
}

#[test]
fn wait_until_idle_delays_after_each_busy_read_before_timing_out() {
    let mut expectations = Vec::new();
    for _ in 0..2 {
        expectations.extend(status_read(0x01));
    }
    let mut i2c = I2cMock::new(&expectations);
    let mut delay = CheckedDelay::new(&[
        DelayTransaction::delay_ms(500),
        DelayTransaction::delay_ms(500),
    ]);
    let mut sensor = LidarLite::new(i2c.clone(), delay.clone());

    assert!(matches!(
        sensor.wait_until_idle(500, Some(2)),
        Err(Error::Timeout { polls: 2 })
    ));

    i2c.done();
    delay.done();
}
