//! Throughput metering
//!
//! Instantaneous bits-per-second from a byte count and the wall-clock
//! interval the caller measured around the transfer.

use std::time::Duration;

/// Compute an instantaneous rate in bits per second.
///
/// The interval is truncated to whole microseconds. A zero-length interval
/// reports `0.0` rather than dividing by zero.
pub fn bits_per_second(byte_count: u64, elapsed: Duration) -> f64 {
    let micros = elapsed.as_micros();
    if micros == 0 {
        return 0.0;
    }
    (byte_count as f64) * 8.0 * 1e6 / (micros as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_formula() {
        // 1000 bytes in exactly one second is 8000 bits/s
        let rate = bits_per_second(1000, Duration::from_secs(1));
        assert!((rate - 8000.0).abs() < f64::EPSILON);

        // 32 bytes in 2ms: 32 * 8 * 1e6 / 2000 = 128_000
        let rate = bits_per_second(32, Duration::from_millis(2));
        assert!((rate - 128_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_elapsed_is_zero_rate() {
        assert_eq!(bits_per_second(4096, Duration::ZERO), 0.0);
        // Sub-microsecond intervals truncate to zero as well
        assert_eq!(bits_per_second(4096, Duration::from_nanos(500)), 0.0);
    }

    #[test]
    fn test_zero_bytes() {
        assert_eq!(bits_per_second(0, Duration::from_millis(5)), 0.0);
    }
}
