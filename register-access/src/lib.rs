#![no_std]

use device_descriptor::{ReadOnlyRegister, RegisterWidthType};

pub trait RegisterReader<RWT>: Sized
where
    RWT: RegisterWidthType,
{
    fn read<E>(iface: &mut impl RegisterAccess<RWT, Error = E>) -> Result<Self, E>;
}

impl<T, RWT> RegisterReader<RWT> for T
where
    T: ReadOnlyRegister<RWT>,
    RWT: RegisterWidthType,
{
    fn read<E>(iface: &mut impl RegisterAccess<RWT, Error = E>) -> Result<Self, E> {
        iface.read_register()
    }
}

/// A bus that can fetch the contents of a register by its address.
pub trait RegisterAccess<RWT>
where
    RWT: RegisterWidthType,
{
    type Error;

    fn read_register_bits(&mut self, address: u8) -> Result<RWT, Self::Error>;

    fn read_register<R>(&mut self) -> Result<R, Self::Error>
    where
        R: ReadOnlyRegister<RWT>,
    {
        self.read_register_bits(R::ADDRESS).map(R::from_bits)
    }
}

impl<T, RWT> RegisterAccess<RWT> for &mut T
where
    T: RegisterAccess<RWT>,
    RWT: RegisterWidthType,
{
    type Error = T::Error;

    fn read_register_bits(&mut self, address: u8) -> Result<RWT, Self::Error> {
        (**self).read_register_bits(address)
    }
}
