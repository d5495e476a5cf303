use ufmt::{uDisplay, uwrite};

use crate::{config::DesignCapacity, metrics::DerivedMetrics, property::Property};

/// Renders metrics as power supply uevent lines, e.g. `POWER_SUPPLY_CAPACITY=75`.
///
/// Properties without data are left out.
#[derive(Clone, Copy)]
pub struct Uevent<'a> {
    pub metrics: &'a DerivedMetrics,
    pub design: &'a DesignCapacity,
}

impl uDisplay for Uevent<'_> {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        for property in Property::ALL {
            if let Some(value) = self.metrics.property(property, self.design) {
                uwrite!(f, "{}={}\n", property.uevent_key(), value)?;
            }
        }

        Ok(())
    }
}
