#![no_std]

//! Logging facade for the driver crates.
//!
//! The backend is picked by the *calling* crate's `log` or `defmt` feature. With neither
//! enabled the arguments are still type-checked, so a message that compiles without a
//! backend also compiles with one.

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($level:ident, $($args:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::$level!($($args)*);
        #[cfg(feature = "log")]
        log::$level!($($args)*);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        let _ = core::format_args!($($args)*);
    }};
}

#[macro_export]
macro_rules! trace {
    ($($args:tt)*) => {
        $crate::__log!(trace, $($args)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($args:tt)*) => {
        $crate::__log!(debug, $($args)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($args:tt)*) => {
        $crate::__log!(info, $($args)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($args:tt)*) => {
        $crate::__log!(warn, $($args)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($args:tt)*) => {
        $crate::__log!(error, $($args)*)
    };
}
