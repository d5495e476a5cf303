use device_descriptor::device;

device! {
    /// 12-bit ADC measurement of the cell voltage, left aligned.
    /// LSB = 78.125μV
    VCell(u16, addr = 0x02) {
        voltage(pos = 0, width = 16): u16
    }

    /// The ModelGauge algorithm's state of charge.
    /// The upper byte is whole percent, the lower byte is 1/256%.
    Soc(u16, addr = 0x04) {
        percentage(pos = 0, width = 16): u16
    }

    /// Production version of the IC.
    Version(u16, addr = 0x08) {
        version(pos = 0, width = 16): u16
    }

    /// Approximate charge or discharge rate of the battery, two's complement.
    /// LSB = 0.208%/hr
    CRate(u16, addr = 0x16) {
        rate(pos = 0, width = 16): u16
    }
}
