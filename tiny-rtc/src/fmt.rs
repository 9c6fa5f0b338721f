//! Logging shim.
//!
//! Forwards to `defmt` when that feature is enabled (outside of tests, where
//! no global logger is linked), otherwise to `log` when that feature is
//! enabled. With neither, the macros only borrow their arguments.

// Some feature combinations result in some of these macros never being used.
#![allow(unused_macros)]

macro_rules! log {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(all(feature = "log", not(all(feature = "defmt", not(test)))))]
            ::log::$level!($s $(, $x)*);
            #[cfg(not(any(all(feature = "defmt", not(test)), feature = "log")))]
            let _ = ($( & $x, )*);
        }
    };
}

macro_rules! error {
    ($($tt:tt)*) => { log!(error, $($tt)*) }
}

macro_rules! warn {
    ($($tt:tt)*) => { log!(warn, $($tt)*) }
}

macro_rules! info {
    ($($tt:tt)*) => { log!(info, $($tt)*) }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(debug, $($tt)*) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(trace, $($tt)*) }
}
