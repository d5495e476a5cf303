use device_descriptor::RegisterWidthType;
use embedded_hal::i2c::I2c;
use register_access::RegisterAccess;

pub struct Max17048I2cInterface<I> {
    pub i2c: I,
}

impl<I> Max17048I2cInterface<I> {
    pub const DEVICE_ADDR: u8 = 0x36;
}

impl<I> RegisterAccess<u16> for Max17048I2cInterface<I>
where
    I: I2c,
{
    type Error = I::Error;

    fn read_register_bits(&mut self, address: u8) -> Result<u16, Self::Error> {
        let mut buffer = [0; 2];

        self.i2c
            .write_read(Self::DEVICE_ADDR, &[address], &mut buffer)?;

        Ok(u16::from_wire_bytes(&buffer))
    }
}
