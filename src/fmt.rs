//! Logging facade shared by the whole crate.
//!
//! Exactly one of the `log`/`defmt` features selects the backend; with neither enabled the
//! macros expand to nothing so the core stays usable on targets without either crate.

#[cfg(all(feature = "log", feature = "defmt"))]
compile_error!("`log` and `defmt` features are mutually exclusive");

macro_rules! trace {
    ($($arg:tt)*) => {
        {
            #[cfg(feature = "log")]
            ::log::trace!($($arg)*);
            #[cfg(feature = "defmt")]
            ::defmt::trace!($($arg)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($($arg)*,);
        }
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        {
            #[cfg(feature = "log")]
            ::log::debug!($($arg)*);
            #[cfg(feature = "defmt")]
            ::defmt::debug!($($arg)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($($arg)*,);
        }
    };
}

// Named `warn_log` rather than `warn`: a macro_rules item literally named `warn`, re-exported
// via `pub(crate) use`, is ambiguous with the built-in `#[warn(...)]` lint attribute.
macro_rules! warn_log {
    ($($arg:tt)*) => {
        {
            #[cfg(feature = "log")]
            ::log::warn!($($arg)*);
            #[cfg(feature = "defmt")]
            ::defmt::warn!($($arg)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($($arg)*,);
        }
    };
}

macro_rules! error {
    ($($arg:tt)*) => {
        {
            #[cfg(feature = "log")]
            ::log::error!($($arg)*);
            #[cfg(feature = "defmt")]
            ::defmt::error!($($arg)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($($arg)*,);
        }
    };
}

pub(crate) use debug;
pub(crate) use error;
pub(crate) use trace;
pub(crate) use warn_log;
