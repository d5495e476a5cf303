use core::convert::Infallible;

use max17048::RawSnapshot;

use crate::{
    config::DesignCapacity,
    estimate,
    property::{Property, PropertyValue, Status, Technology},
};

/// Everything that can be derived from one set of register values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DerivedMetrics {
    pub voltage_uv: u32,
    pub soc_percent: u8,
    pub status: Status,
    pub current_ua: i32,
    pub time_to_empty_s: Option<u32>,
    pub time_to_full_s: Option<u32>,
}

impl DerivedMetrics {
    pub fn estimate(snapshot: &RawSnapshot, design: &DesignCapacity) -> Self {
        let soc_percent = snapshot.soc_percent();
        let c_rate = snapshot.c_rate();

        Self {
            voltage_uv: snapshot.voltage_uv(),
            soc_percent,
            status: estimate::status(c_rate, || Ok::<_, Infallible>(soc_percent)),
            current_ua: estimate::current_ua(design, c_rate),
            time_to_empty_s: estimate::time_to_empty(design, c_rate, soc_percent),
            time_to_full_s: estimate::time_to_full(c_rate, soc_percent),
        }
    }

    /// Returns `None` for time estimates that have no data.
    pub fn property(&self, property: Property, design: &DesignCapacity) -> Option<PropertyValue> {
        let value = match property {
            Property::Status => PropertyValue::Status(self.status),
            Property::VoltageNow => PropertyValue::Voltage(self.voltage_uv),
            Property::Capacity => PropertyValue::Soc(self.soc_percent),
            Property::ChargeFullDesign => {
                PropertyValue::ChargeFullDesign(design.charge_full_design_uah())
            }
            Property::ChargeNow => PropertyValue::ChargeNow(design.charge_now_uah(self.soc_percent)),
            Property::EnergyFullDesign => {
                PropertyValue::EnergyFullDesign(design.energy_full_design_uwh())
            }
            Property::Technology => PropertyValue::Technology(Technology::LithiumPolymer),
            Property::CurrentNow => PropertyValue::Current(self.current_ua),
            Property::TimeToEmptyNow => PropertyValue::TimeToEmpty(self.time_to_empty_s?),
            Property::TimeToFullNow => PropertyValue::TimeToFull(self.time_to_full_s?),
        };

        Some(value)
    }
}
