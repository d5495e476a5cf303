use core::num::NonZeroU32;

pub const CHARGE_FULL_DESIGN_UAH: &str = "charge-full-design-microamp-hours";
pub const BATTERY_CAPACITY_MAH: &str = "battery-capacity";
pub const ENERGY_FULL_DESIGN_UWH: &str = "energy-full-design-microwatt-hours";

const fn non_zero(value: u32) -> NonZeroU32 {
    match NonZeroU32::new(value) {
        Some(value) => value,
        None => panic!("capacity must not be zero"),
    }
}

/// Assumed when no capacity is configured.
pub const DEFAULT_CHARGE_FULL_DESIGN_UAH: NonZeroU32 = non_zero(5_000_000);
pub const MAX_CHARGE_FULL_DESIGN_UAH: NonZeroU32 = non_zero(100_000_000);
pub const MAX_ENERGY_FULL_DESIGN_UWH: u32 = 370_000_000;

/// Legacy capacities at or above this are not trusted.
const MAX_LEGACY_CAPACITY_MAH: u32 = 20_000;

/// Design energy of a cell at 3.7V nominal voltage.
const fn nominal_energy_uwh(charge: NonZeroU32) -> u32 {
    (charge.get() as u64 * 37 / 10) as u32
}

/// Read access to integer firmware properties, e.g. a device tree node.
pub trait PropertySource {
    fn read_u32(&self, name: &str) -> Option<u32>;
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryConfig {
    /// Design charge capacity in μAh.
    pub charge_full_design_uah: Option<u32>,

    /// Design capacity in mAh. Only used if `charge_full_design_uah` is missing.
    pub battery_capacity_mah: Option<u32>,

    /// Design energy in μWh. Estimated from the charge capacity if missing or zero.
    pub energy_full_design_uwh: Option<u32>,
}

impl BatteryConfig {
    pub fn from_properties(source: &impl PropertySource) -> Self {
        Self {
            charge_full_design_uah: source.read_u32(CHARGE_FULL_DESIGN_UAH),
            battery_capacity_mah: source.read_u32(BATTERY_CAPACITY_MAH),
            energy_full_design_uwh: source.read_u32(ENERGY_FULL_DESIGN_UWH),
        }
    }

    /// Resolves the design values, falling back to defaults and clamping to sane limits.
    pub fn resolve(&self) -> DesignCapacity {
        let charge_full_design_uah = self.resolve_charge();
        let energy_full_design_uwh = self.resolve_energy(charge_full_design_uah);

        info!(
            "Design: {} uAh, {} uWh",
            charge_full_design_uah.get(),
            energy_full_design_uwh
        );

        DesignCapacity {
            charge_full_design_uah,
            energy_full_design_uwh,
        }
    }

    fn legacy_capacity_uah(&self) -> Option<u32> {
        match self.battery_capacity_mah? {
            mah if (1..MAX_LEGACY_CAPACITY_MAH).contains(&mah) => {
                warn!("Using legacy battery capacity of {} mAh", mah);
                Some(mah * 1000)
            }
            mah => {
                warn!("Ignoring battery capacity of {} mAh", mah);
                None
            }
        }
    }

    fn resolve_charge(&self) -> NonZeroU32 {
        // A configured zero does not fall back to the legacy property.
        let configured = match self.charge_full_design_uah {
            Some(uah) => Some(uah),
            None => self.legacy_capacity_uah(),
        };

        let Some(charge) = configured.and_then(NonZeroU32::new) else {
            warn!(
                "Capacity not configured, default {} uAh",
                DEFAULT_CHARGE_FULL_DESIGN_UAH.get()
            );
            return DEFAULT_CHARGE_FULL_DESIGN_UAH;
        };

        if charge > MAX_CHARGE_FULL_DESIGN_UAH {
            warn!(
                "Capacity too high ({} uAh), clamping to {} uAh",
                charge.get(),
                MAX_CHARGE_FULL_DESIGN_UAH.get()
            );
            return MAX_CHARGE_FULL_DESIGN_UAH;
        }

        charge
    }

    fn resolve_energy(&self, charge: NonZeroU32) -> u32 {
        let energy = match self.energy_full_design_uwh {
            Some(uwh) if uwh != 0 => uwh,
            _ => {
                let estimate = nominal_energy_uwh(charge);
                warn!("Energy not configured, estimated {} uWh", estimate);
                estimate
            }
        };

        if energy > MAX_ENERGY_FULL_DESIGN_UWH {
            warn!(
                "Energy too high ({} uWh), clamping to {} uWh",
                energy, MAX_ENERGY_FULL_DESIGN_UWH
            );
            return MAX_ENERGY_FULL_DESIGN_UWH;
        }

        energy
    }
}

/// Design capacity of the cell, resolved once per device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DesignCapacity {
    charge_full_design_uah: NonZeroU32,
    energy_full_design_uwh: u32,
}

impl Default for DesignCapacity {
    fn default() -> Self {
        Self {
            charge_full_design_uah: DEFAULT_CHARGE_FULL_DESIGN_UAH,
            energy_full_design_uwh: nominal_energy_uwh(DEFAULT_CHARGE_FULL_DESIGN_UAH),
        }
    }
}

impl DesignCapacity {
    /// Design charge capacity in μAh. Never zero.
    pub fn charge_full_design_uah(&self) -> u32 {
        self.charge_full_design_uah.get()
    }

    pub fn charge_full_design(&self) -> NonZeroU32 {
        self.charge_full_design_uah
    }

    /// Design energy in μWh.
    pub fn energy_full_design_uwh(&self) -> u32 {
        self.energy_full_design_uwh
    }

    /// Remaining charge in μAh at the given state of charge.
    pub fn charge_now_uah(&self, soc_percent: u8) -> u32 {
        (soc_percent as u64 * self.charge_full_design_uah() as u64 / 100) as u32
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Properties<'a>(&'a [(&'a str, u32)]);

    impl PropertySource for Properties<'_> {
        fn read_u32(&self, name: &str) -> Option<u32> {
            self.0
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
        }
    }

    fn resolve(properties: &[(&str, u32)]) -> DesignCapacity {
        BatteryConfig::from_properties(&Properties(properties)).resolve()
    }

    #[test]
    fn explicit_charge_is_used() {
        let design = resolve(&[("charge-full-design-microamp-hours", 4_000_000)]);

        assert_eq!(design.charge_full_design_uah(), 4_000_000);
        assert_eq!(design.energy_full_design_uwh(), 14_800_000);
    }

    #[test]
    fn excessive_charge_is_clamped() {
        let design = resolve(&[("charge-full-design-microamp-hours", 200_000_000)]);

        assert_eq!(design.charge_full_design_uah(), 100_000_000);
        assert_eq!(design.energy_full_design_uwh(), 370_000_000);
    }

    #[test]
    fn legacy_capacity_is_converted() {
        let design = resolve(&[("battery-capacity", 3000)]);

        assert_eq!(design.charge_full_design_uah(), 3_000_000);
    }

    #[test]
    fn explicit_charge_wins_over_legacy_capacity() {
        let design = resolve(&[
            ("battery-capacity", 3000),
            ("charge-full-design-microamp-hours", 2_500_000),
        ]);

        assert_eq!(design.charge_full_design_uah(), 2_500_000);
    }

    #[test]
    fn implausible_legacy_capacity_is_ignored() {
        #[rustfmt::skip]
        let table = [
            0,
            20_000,
            50_000,
        ];

        for mah in table {
            let design = resolve(&[("battery-capacity", mah)]);
            assert_eq!(design.charge_full_design_uah(), 5_000_000, "{mah} mAh");
        }

        let design = resolve(&[("battery-capacity", 19_999)]);
        assert_eq!(design.charge_full_design_uah(), 19_999_000);
    }

    #[test]
    fn missing_configuration_uses_default() {
        let design = resolve(&[]);

        assert_eq!(design.charge_full_design_uah(), 5_000_000);
        assert_eq!(design.energy_full_design_uwh(), 18_500_000);
        assert_eq!(design, DesignCapacity::default());
    }

    #[test]
    fn configured_zero_charge_uses_default() {
        let design = resolve(&[
            ("charge-full-design-microamp-hours", 0),
            ("battery-capacity", 3000),
        ]);

        assert_eq!(design.charge_full_design_uah(), 5_000_000);
    }

    #[test]
    fn explicit_energy_is_used() {
        let design = resolve(&[
            ("charge-full-design-microamp-hours", 5_000_000),
            ("energy-full-design-microwatt-hours", 19_000_000),
        ]);

        assert_eq!(design.energy_full_design_uwh(), 19_000_000);
    }

    #[test]
    fn zero_energy_is_estimated() {
        let design = resolve(&[
            ("charge-full-design-microamp-hours", 5_000_000),
            ("energy-full-design-microwatt-hours", 0),
        ]);

        assert_eq!(design.energy_full_design_uwh(), 18_500_000);
    }

    #[test]
    fn excessive_energy_is_clamped() {
        let design = resolve(&[("energy-full-design-microwatt-hours", 500_000_000)]);

        assert_eq!(design.energy_full_design_uwh(), 370_000_000);
    }

    #[test]
    fn charge_now_scales_with_soc() {
        let design = resolve(&[("charge-full-design-microamp-hours", 3_000_000)]);

        assert_eq!(design.charge_now_uah(0), 0);
        assert_eq!(design.charge_now_uah(75), 2_250_000);
        assert_eq!(design.charge_now_uah(100), 3_000_000);
    }

    #[cfg(feature = "log")]
    mod logging {
        use std::{cell::RefCell, sync::Once};

        use log::{Level, LevelFilter, Log, Metadata, Record};

        use super::*;

        thread_local! {
            static RECORDS: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
        }

        struct CapturingLogger;

        impl Log for CapturingLogger {
            fn enabled(&self, _metadata: &Metadata) -> bool {
                true
            }

            fn log(&self, record: &Record) {
                RECORDS.with(|records| {
                    records
                        .borrow_mut()
                        .push((record.level(), record.args().to_string()))
                });
            }

            fn flush(&self) {}
        }

        static LOGGER: CapturingLogger = CapturingLogger;
        static INIT: Once = Once::new();

        fn warnings_while(f: impl FnOnce()) -> Vec<String> {
            INIT.call_once(|| {
                log::set_logger(&LOGGER).unwrap();
                log::set_max_level(LevelFilter::Trace);
            });
            RECORDS.with(|records| records.borrow_mut().clear());

            f();

            RECORDS.with(|records| {
                records
                    .borrow()
                    .iter()
                    .filter(|(level, _)| *level == Level::Warn)
                    .map(|(_, message)| message.clone())
                    .collect()
            })
        }

        #[test]
        fn legacy_capacity_and_estimated_energy_are_reported() {
            let warnings = warnings_while(|| {
                BatteryConfig {
                    battery_capacity_mah: Some(3000),
                    ..Default::default()
                }
                .resolve();
            });

            assert_eq!(
                warnings,
                [
                    "Using legacy battery capacity of 3000 mAh",
                    "Energy not configured, estimated 11100000 uWh",
                ]
            );
        }

        #[test]
        fn configured_values_are_not_reported() {
            let warnings = warnings_while(|| {
                BatteryConfig {
                    charge_full_design_uah: Some(3_000_000),
                    energy_full_design_uwh: Some(11_000_000),
                    ..Default::default()
                }
                .resolve();
            });

            assert!(warnings.is_empty(), "{warnings:?}");
        }
    }
}
