#![no_std]

use core::{convert::TryFrom, marker::PhantomData};

pub trait RegisterWidthType: Copy {
    const WIDTH: u8;
    const BYTES: usize = Self::WIDTH as usize / 8;

    fn from_32(data: u32) -> Self;
    fn to_32(self) -> u32;

    /// Assembles a register value from its on-wire bytes, most significant byte first.
    fn from_wire_bytes(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() == Self::BYTES);

        let value = bytes
            .iter()
            .fold(0u32, |acc, &byte| (acc << 8) | byte as u32);

        Self::from_32(value)
    }
}

impl RegisterWidthType for u8 {
    const WIDTH: u8 = 8;

    fn from_32(data: u32) -> Self {
        debug_assert!(data <= u8::MAX as u32);
        data as u8
    }

    fn to_32(self) -> u32 {
        self as u32
    }
}

impl RegisterWidthType for u16 {
    const WIDTH: u8 = 16;

    fn from_32(data: u32) -> Self {
        debug_assert!(data <= u16::MAX as u32);
        data as u16
    }

    fn to_32(self) -> u32 {
        self as u32
    }
}

pub trait ReadOnlyRegister<RWT: RegisterWidthType>: Proxy<RWT> + Copy {
    const ADDRESS: u8;
    const NAME: &'static str;
}

pub trait Proxy<RWT: RegisterWidthType> {
    fn bits(&self) -> RWT;
    fn from_bits(bits: RWT) -> Self;
}

pub struct Field<const POS: u8, const WIDTH: u8, DataType, P, RWT> {
    _marker: PhantomData<(DataType, RWT)>,
    reg: P,
}

impl<const POS: u8, const WIDTH: u8, DataType, P, RWT> Field<POS, WIDTH, DataType, P, RWT>
where
    DataType: TryFrom<RWT>,
    P: Proxy<RWT>,
    RWT: RegisterWidthType,
{
    const MASK: u32 = ((1u64 << WIDTH) - 1) as u32;

    pub const fn new(reg: P) -> Self {
        Field {
            _marker: PhantomData,
            reg,
        }
    }

    #[inline(always)]
    pub fn read_field_bits(&self) -> RWT {
        RWT::from_32((self.reg.bits().to_32() >> POS as u32) & Self::MASK)
    }

    #[inline(always)]
    pub fn read(&self) -> Option<DataType> {
        DataType::try_from(self.read_field_bits()).ok()
    }
}

#[macro_export]
macro_rules! impl_fields {
    () => {};

    ($($field:ident($rwt:ty, pos = $pos:literal, width = $width:literal): $type:ty),*) => {
        $(
            #[inline(always)]
            #[allow(non_snake_case)]
            pub fn $field(self) -> $crate::Field<$pos, $width, $type, Self, $rwt> {
                $crate::Field::new(self)
            }
        )*
    };
}

#[macro_export]
macro_rules! register {
    (
        $(#[$meta:meta])*
        $reg:ident ($rwt:ty, addr = $addr:literal) {
            $( $(#[$field_meta:meta])* $field:ident(pos = $pos:literal, width = $width:literal): $type:ty ),*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        #[must_use]
        #[allow(non_camel_case_types)]
        pub struct $reg {
            value: $rwt
        }

        impl $crate::ReadOnlyRegister<$rwt> for $reg {
            const ADDRESS: u8 = $addr;
            const NAME: &'static str = stringify!($reg);
        }

        impl $crate::Proxy<$rwt> for $reg {
            #[inline(always)]
            fn from_bits(bits: $rwt) -> Self {
                Self { value: bits }
            }

            #[inline(always)]
            fn bits(&self) -> $rwt {
                self.value
            }
        }

        impl $reg {
            $crate::impl_fields! { $($field($rwt, pos = $pos, width = $width): $type),* }
        }
    };
}

#[macro_export]
macro_rules! device {
    (
        $(
            $(#[$meta:meta])*
            $reg:ident($($proto:tt)*) {
                $($fields:tt)*
            }
        )+
    ) => {
        $(
            $crate::register!($(#[$meta])* $reg($($proto)*) { $($fields)* } );
        )+
    }
}
