use ufmt::{uDisplay, uwrite};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Charging,
    Discharging,
    Full,
    NotCharging,
    Unknown,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Charging => "Charging",
            Status::Discharging => "Discharging",
            Status::Full => "Full",
            Status::NotCharging => "Not charging",
            Status::Unknown => "Unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Technology {
    LithiumPolymer,
}

impl Technology {
    pub const fn as_str(self) -> &'static str {
        match self {
            Technology::LithiumPolymer => "LiPo",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Property {
    Status,
    VoltageNow,
    Capacity,
    ChargeFullDesign,
    ChargeNow,
    EnergyFullDesign,
    Technology,
    CurrentNow,
    TimeToEmptyNow,
    TimeToFullNow,
}

impl Property {
    /// Every reported property, in reporting order.
    pub const ALL: [Property; 10] = [
        Property::Status,
        Property::VoltageNow,
        Property::Capacity,
        Property::ChargeFullDesign,
        Property::ChargeNow,
        Property::EnergyFullDesign,
        Property::Technology,
        Property::CurrentNow,
        Property::TimeToEmptyNow,
        Property::TimeToFullNow,
    ];

    pub const fn uevent_key(self) -> &'static str {
        match self {
            Property::Status => "POWER_SUPPLY_STATUS",
            Property::VoltageNow => "POWER_SUPPLY_VOLTAGE_NOW",
            Property::Capacity => "POWER_SUPPLY_CAPACITY",
            Property::ChargeFullDesign => "POWER_SUPPLY_CHARGE_FULL_DESIGN",
            Property::ChargeNow => "POWER_SUPPLY_CHARGE_NOW",
            Property::EnergyFullDesign => "POWER_SUPPLY_ENERGY_FULL_DESIGN",
            Property::Technology => "POWER_SUPPLY_TECHNOLOGY",
            Property::CurrentNow => "POWER_SUPPLY_CURRENT_NOW",
            Property::TimeToEmptyNow => "POWER_SUPPLY_TIME_TO_EMPTY_NOW",
            Property::TimeToFullNow => "POWER_SUPPLY_TIME_TO_FULL_NOW",
        }
    }
}

/// The value of a single [`Property`], in the units the power supply class uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyValue {
    Status(Status),
    /// μV
    Voltage(u32),
    /// %
    Soc(u8),
    /// μAh
    ChargeNow(u32),
    /// μAh
    ChargeFullDesign(u32),
    /// μWh
    EnergyFullDesign(u32),
    Technology(Technology),
    /// μA, negative while discharging
    Current(i32),
    /// s
    TimeToEmpty(u32),
    /// s
    TimeToFull(u32),
}

impl uDisplay for PropertyValue {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        match *self {
            PropertyValue::Status(status) => f.write_str(status.as_str()),
            PropertyValue::Technology(technology) => f.write_str(technology.as_str()),
            PropertyValue::Soc(percent) => uwrite!(f, "{}", percent),
            PropertyValue::Current(current) => uwrite!(f, "{}", current),
            PropertyValue::Voltage(value)
            | PropertyValue::ChargeNow(value)
            | PropertyValue::ChargeFullDesign(value)
            | PropertyValue::EnergyFullDesign(value)
            | PropertyValue::TimeToEmpty(value)
            | PropertyValue::TimeToFull(value) => uwrite!(f, "{}", value),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyError<E> {
    Bus(E),
    /// The property has no meaningful value right now.
    NoData,
}
