//! Battery state derived from decoded fuel gauge readings.
//!
//! Rates are in C-rate LSBs (0.208%/hr of the design capacity). Every function here is pure;
//! register reads are left to the caller so that a value is only read when it's needed.

use crate::{config::DesignCapacity, property::Status};

/// Rates within this many LSBs of zero have an untrusted sign (~0.8%/hr).
pub const NOISE_THRESHOLD: i16 = 4;

/// Time estimates need a rate beyond this many LSBs.
pub const TIME_ESTIMATE_THRESHOLD: i16 = 10;

/// An idle cell at or above this SOC is reported as full.
pub const FULL_SOC_PERCENT: u8 = 95;

/// 300mA expressed in LSBs is this value divided by the design capacity in μAh.
const MIN_LOAD_RATE_UAH: u32 = 144_230_769;

pub fn status<E>(c_rate: i16, soc_percent: impl FnOnce() -> Result<u8, E>) -> Status {
    if c_rate > NOISE_THRESHOLD {
        return Status::Charging;
    }
    if c_rate < -NOISE_THRESHOLD {
        return Status::Discharging;
    }

    match soc_percent() {
        Ok(soc) if soc >= FULL_SOC_PERCENT => Status::Full,
        Ok(_) => Status::NotCharging,
        Err(_) => Status::Unknown,
    }
}

/// Battery current in μA. Positive while charging.
///
/// Truncates toward zero like the gauge's own integer math.
pub fn current_ua(design: &DesignCapacity, c_rate: i16) -> i32 {
    let current = design.charge_full_design_uah() as i64 * c_rate as i64 * 52 / 25_000;

    current.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

pub fn is_discharging(c_rate: i16) -> bool {
    c_rate < -TIME_ESTIMATE_THRESHOLD
}

pub fn is_charging(c_rate: i16) -> bool {
    c_rate > TIME_ESTIMATE_THRESHOLD
}

/// The smallest discharge rate assumed for time-to-empty, equivalent to a 300mA load.
pub fn min_discharge_rate(design: &DesignCapacity) -> i32 {
    (MIN_LOAD_RATE_UAH / design.charge_full_design().get()) as i32
}

/// Seconds until empty, or `None` if the cell isn't discharging noticeably.
pub fn time_to_empty(design: &DesignCapacity, c_rate: i16, soc_percent: u8) -> Option<u32> {
    if !is_discharging(c_rate) {
        return None;
    }

    let discharge_rate = (c_rate as i32).abs().max(min_discharge_rate(design));
    if discharge_rate <= 0 {
        return None;
    }

    let seconds = 225_000 * soc_percent as i64 / (discharge_rate as i64 * 13);
    u32::try_from(seconds).ok()
}

/// Seconds until full, or `None` if the cell isn't charging noticeably.
pub fn time_to_full(c_rate: i16, soc_percent: u8) -> Option<u32> {
    if !is_charging(c_rate) || c_rate == 0 {
        return None;
    }

    let missing = 100u8.saturating_sub(soc_percent);
    let seconds = 225_000 * missing as i64 / (c_rate as i64 * 13);
    u32::try_from(seconds).ok()
}

#[cfg(test)]
mod test {
    use core::convert::Infallible;

    use super::*;
    use crate::config::BatteryConfig;

    fn design(charge_full_design_uah: u32) -> DesignCapacity {
        BatteryConfig {
            charge_full_design_uah: Some(charge_full_design_uah),
            ..Default::default()
        }
        .resolve()
    }

    #[test]
    fn test_status() {
        #[rustfmt::skip]
        let table = [
            (5, 50, Status::Charging),
            (-5, 50, Status::Discharging),
            (0, 96, Status::Full),
            (0, 95, Status::Full),
            (0, 50, Status::NotCharging),
            (4, 94, Status::NotCharging),
            (-4, 100, Status::Full),
        ];

        for (c_rate, soc, expected) in table {
            assert_eq!(
                status(c_rate, || Ok::<_, Infallible>(soc)),
                expected,
                "c_rate {c_rate}, soc {soc}"
            );
        }
    }

    #[test]
    fn status_reads_soc_only_when_idle() {
        let status = status(100, || -> Result<u8, ()> { panic!("SOC was read") });

        assert_eq!(status, Status::Charging);
    }

    #[test]
    fn failed_soc_read_is_unknown_status() {
        assert_eq!(status(0, || Err(())), Status::Unknown);
    }

    #[test]
    fn test_current() {
        let design = design(5_000_000);

        #[rustfmt::skip]
        let table = [
            (0, 0),
            (1, 10_400),
            (-12, -124_800),
            (100, 1_040_000),
            (i16::MIN, -340_787_200),
        ];

        for (c_rate, expected) in table {
            assert_eq!(current_ua(&design, c_rate), expected, "c_rate {c_rate}");
        }
    }

    #[test]
    fn current_truncates_toward_zero() {
        // 1000 * 52 / 25_000 = 2.08
        let design = design(1000);

        assert_eq!(current_ua(&design, 1), 2);
        assert_eq!(current_ua(&design, -1), -2);
        assert_eq!(current_ua(&design, -25), -52);
    }

    #[test]
    fn current_sign_follows_rate() {
        let design = design(2_000_000);

        for c_rate in i16::MIN..=i16::MAX {
            let current = current_ua(&design, c_rate);
            assert_eq!(current.signum(), c_rate.signum() as i32, "c_rate {c_rate}");
        }
    }

    #[test]
    fn time_to_empty_needs_discharge() {
        let design = design(5_000_000);

        for c_rate in [-10, -5, 0, 5, 100] {
            for soc in [0, 50, 100] {
                assert_eq!(time_to_empty(&design, c_rate, soc), None, "c_rate {c_rate}");
            }
        }
    }

    #[test]
    fn time_to_empty_assumes_minimum_load() {
        let design = design(5_000_000);

        assert_eq!(min_discharge_rate(&design), 28);
        // 225000 * 75 / (28 * 13)
        assert_eq!(time_to_empty(&design, -12, 75), Some(46_359));
        // Measured rate above the floor is used as is
        assert_eq!(time_to_empty(&design, -100, 75), Some(12_980));
    }

    #[test]
    fn time_to_empty_with_large_capacity() {
        let design = design(100_000_000);

        // Floor is a single LSB, the measured rate dominates
        assert_eq!(min_discharge_rate(&design), 1);
        assert_eq!(time_to_empty(&design, -11, 100), Some(157_342));
        assert_eq!(time_to_empty(&design, i16::MIN, 100), Some(52));
    }

    #[test]
    fn time_to_empty_with_tiny_capacity() {
        let design = design(1);

        assert_eq!(min_discharge_rate(&design), 144_230_769);
        assert_eq!(time_to_empty(&design, -11, 100), Some(0));
    }

    #[test]
    fn test_time_to_full() {
        #[rustfmt::skip]
        let table = [
            (10, 50, None),
            (0, 50, None),
            (-50, 50, None),
            (11, 100, Some(0)),
            (11, 0, Some(157_342)),
            (50, 75, Some(8_653)),
        ];

        for (c_rate, soc, expected) in table {
            assert_eq!(time_to_full(c_rate, soc), expected, "c_rate {c_rate}, soc {soc}");
        }
    }
}
