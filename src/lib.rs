#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate logger;

use embedded_hal::i2c::I2c;
use max17048::Max17048;

pub mod config;
pub mod estimate;
pub mod metrics;
pub mod property;
pub mod uevent;

pub use config::{BatteryConfig, DesignCapacity, PropertySource};
pub use max17048::RawSnapshot;
pub use metrics::DerivedMetrics;
pub use property::{Property, PropertyError, PropertyValue, Status, Technology};
pub use uevent::Uevent;

/// A MAX17048 gauged battery.
///
/// Every query reads the registers it needs, nothing is cached besides the design capacity.
pub struct Battery<I> {
    gauge: Max17048<I>,
    design: DesignCapacity,
}

impl<I> Battery<I> {
    pub fn new(i2c: I, config: &BatteryConfig) -> Self {
        Self {
            gauge: Max17048::new(i2c),
            design: config.resolve(),
        }
    }

    pub fn design_capacity(&self) -> &DesignCapacity {
        &self.design
    }

    pub fn release(self) -> I {
        self.gauge.release()
    }
}

impl<I> Battery<I>
where
    I: I2c,
{
    /// Creates the battery and checks that the fuel gauge responds.
    pub fn probe(i2c: I, config: &BatteryConfig) -> Result<Self, I::Error> {
        let mut battery = Self::new(i2c, config);

        match battery.gauge.read_version() {
            Ok(version) => info!("MAX17048 version: {}", version),
            Err(e) => {
                error!("Fuel gauge did not respond");
                return Err(e);
            }
        }

        Ok(battery)
    }

    /// Cell voltage in μV.
    pub fn voltage_now(&mut self) -> Result<u32, I::Error> {
        self.gauge.read_vcell()
    }

    /// State of charge in %.
    pub fn capacity(&mut self) -> Result<u8, I::Error> {
        self.gauge.read_soc()
    }

    /// Remaining charge in μAh.
    pub fn charge_now(&mut self) -> Result<u32, I::Error> {
        let soc = self.gauge.read_soc()?;
        Ok(self.design.charge_now_uah(soc))
    }

    /// Never fails, a failed read is reported as [`Status::Unknown`].
    pub fn status(&mut self) -> Status {
        let c_rate = match self.gauge.read_crate() {
            Ok(c_rate) => c_rate,
            Err(_) => {
                warn!("Failed to read charge rate");
                return Status::Unknown;
            }
        };

        estimate::status(c_rate, || self.gauge.read_soc())
    }

    /// Battery current in μA, negative while discharging.
    pub fn current_now(&mut self) -> Result<i32, I::Error> {
        let c_rate = self.gauge.read_crate()?;
        Ok(estimate::current_ua(&self.design, c_rate))
    }

    /// Seconds until empty. `None` if the battery isn't discharging.
    pub fn time_to_empty_now(&mut self) -> Result<Option<u32>, I::Error> {
        let c_rate = self.gauge.read_crate()?;
        // SOC is only needed past the rate threshold
        if !estimate::is_discharging(c_rate) {
            return Ok(None);
        }

        let soc = self.gauge.read_soc()?;
        Ok(estimate::time_to_empty(&self.design, c_rate, soc))
    }

    /// Seconds until full. `None` if the battery isn't charging.
    pub fn time_to_full_now(&mut self) -> Result<Option<u32>, I::Error> {
        let c_rate = self.gauge.read_crate()?;
        // SOC is only needed past the rate threshold
        if !estimate::is_charging(c_rate) {
            return Ok(None);
        }

        let soc = self.gauge.read_soc()?;
        Ok(estimate::time_to_full(c_rate, soc))
    }

    pub fn property(
        &mut self,
        property: Property,
    ) -> Result<PropertyValue, PropertyError<I::Error>> {
        let value = match property {
            Property::Status => PropertyValue::Status(self.status()),
            Property::VoltageNow => {
                PropertyValue::Voltage(self.voltage_now().map_err(PropertyError::Bus)?)
            }
            Property::Capacity => PropertyValue::Soc(self.capacity().map_err(PropertyError::Bus)?),
            Property::ChargeFullDesign => {
                PropertyValue::ChargeFullDesign(self.design.charge_full_design_uah())
            }
            Property::ChargeNow => {
                PropertyValue::ChargeNow(self.charge_now().map_err(PropertyError::Bus)?)
            }
            Property::EnergyFullDesign => {
                PropertyValue::EnergyFullDesign(self.design.energy_full_design_uwh())
            }
            Property::Technology => PropertyValue::Technology(Technology::LithiumPolymer),
            Property::CurrentNow => {
                PropertyValue::Current(self.current_now().map_err(PropertyError::Bus)?)
            }
            Property::TimeToEmptyNow => PropertyValue::TimeToEmpty(
                self.time_to_empty_now()
                    .map_err(PropertyError::Bus)?
                    .ok_or(PropertyError::NoData)?,
            ),
            Property::TimeToFullNow => PropertyValue::TimeToFull(
                self.time_to_full_now()
                    .map_err(PropertyError::Bus)?
                    .ok_or(PropertyError::NoData)?,
            ),
        };

        Ok(value)
    }

    /// Reads the registers once and derives every metric from the same values.
    pub fn read_metrics(&mut self) -> Result<DerivedMetrics, I::Error> {
        let snapshot = self.gauge.read_snapshot()?;
        let metrics = DerivedMetrics::estimate(&snapshot, &self.design);

        debug!(
            "Battery: {} uV, {}%, {} uA",
            metrics.voltage_uv, metrics.soc_percent, metrics.current_ua
        );

        Ok(metrics)
    }
}
