#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate logger;

use device_descriptor::{Proxy, ReadOnlyRegister};
use embedded_hal::i2c::I2c;
use register_access::RegisterReader;

pub mod descriptors;
pub mod ll;

/// Converts the raw VCELL register value to a voltage value in μV.
///
/// ```rust
/// # use max17048::raw_voltage_to_uV;
/// assert_eq!(raw_voltage_to_uV(0), 0);
/// assert_eq!(raw_voltage_to_uV(8), 625);
/// assert_eq!(raw_voltage_to_uV(0xD000), 4_160_000);
/// assert_eq!(raw_voltage_to_uV(65535), 5_119_921);
/// ```
#[allow(non_snake_case)]
#[inline]
pub fn raw_voltage_to_uV(raw: u16) -> u32 {
    (raw as u32 * 625) / 8
}

/// Converts the raw SOC register value to whole percents, clamped to 100%.
///
/// ```rust
/// # use max17048::raw_soc_to_percent;
/// assert_eq!(raw_soc_to_percent(0), 0);
/// assert_eq!(raw_soc_to_percent(19200), 75);
/// assert_eq!(raw_soc_to_percent(0x4BFF), 75);
/// assert_eq!(raw_soc_to_percent(0x6400), 100);
/// assert_eq!(raw_soc_to_percent(0xFFFF), 100);
/// ```
#[inline]
pub fn raw_soc_to_percent(raw: u16) -> u8 {
    (raw / 256).min(100) as u8
}

/// Reinterprets the raw CRATE register value as a signed rate in 0.208%/hr steps.
///
/// ```rust
/// # use max17048::raw_crate_to_lsb;
/// assert_eq!(raw_crate_to_lsb(0x0000), 0);
/// assert_eq!(raw_crate_to_lsb(0x000C), 12);
/// assert_eq!(raw_crate_to_lsb(0xFFF4), -12);
/// assert_eq!(raw_crate_to_lsb(0x8000), i16::MIN);
/// ```
#[inline]
pub fn raw_crate_to_lsb(raw: u16) -> i16 {
    raw as i16
}

/// Register values captured for a single estimation pass.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSnapshot {
    pub vcell_raw: u16,
    pub soc_raw: u16,
    pub crate_raw: u16,
}

impl RawSnapshot {
    /// Cell voltage in μV.
    pub fn voltage_uv(&self) -> u32 {
        raw_voltage_to_uV(self.vcell_raw)
    }

    /// State of charge in %.
    pub fn soc_percent(&self) -> u8 {
        raw_soc_to_percent(self.soc_raw)
    }

    /// Charge (positive) or discharge (negative) rate in 0.208%/hr steps.
    pub fn c_rate(&self) -> i16 {
        raw_crate_to_lsb(self.crate_raw)
    }
}

pub struct Max17048<I> {
    driver: ll::Max17048I2cInterface<I>,
}

impl<I> Max17048<I> {
    pub const fn new(i2c: I) -> Self {
        Self {
            driver: ll::Max17048I2cInterface { i2c },
        }
    }

    pub fn release(self) -> I {
        self.driver.i2c
    }
}

impl<I> Max17048<I>
where
    I: I2c,
{
    fn read<R>(&mut self) -> Result<R, I::Error>
    where
        R: ReadOnlyRegister<u16>,
    {
        let reg = <R as RegisterReader<u16>>::read(&mut self.driver)?;
        trace!("{}: {}", R::NAME, reg.bits());
        Ok(reg)
    }

    /// Returns the cell voltage in μV.
    pub fn read_vcell(&mut self) -> Result<u32, I::Error> {
        let reg = self.read::<descriptors::VCell>()?;
        Ok(raw_voltage_to_uV(reg.voltage().read_field_bits()))
    }

    /// Returns the state of charge in %.
    pub fn read_soc(&mut self) -> Result<u8, I::Error> {
        let reg = self.read::<descriptors::Soc>()?;
        Ok(raw_soc_to_percent(reg.percentage().read_field_bits()))
    }

    /// Returns the charge rate in 0.208%/hr steps. Negative while discharging.
    pub fn read_crate(&mut self) -> Result<i16, I::Error> {
        let reg = self.read::<descriptors::CRate>()?;
        Ok(raw_crate_to_lsb(reg.rate().read_field_bits()))
    }

    /// Returns the production version of the IC.
    pub fn read_version(&mut self) -> Result<u16, I::Error> {
        let reg = self.read::<descriptors::Version>()?;
        Ok(reg.version().read_field_bits())
    }

    /// Reads the voltage, SOC and rate registers, in this order.
    pub fn read_snapshot(&mut self) -> Result<RawSnapshot, I::Error> {
        Ok(RawSnapshot {
            vcell_raw: self.read::<descriptors::VCell>()?.bits(),
            soc_raw: self.read::<descriptors::Soc>()?.bits(),
            crate_raw: self.read::<descriptors::CRate>()?.bits(),
        })
    }
}
