//! Logging macros
//!
//! `defmt` when the `defmt` feature is enabled, the `log` crate otherwise. Format strings in
//! this crate stick to the subset both understand.
cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        #[allow(unused_imports)]
        pub(crate) use defmt::{debug, error, info, trace, warn};
    } else {
        #[allow(unused_imports)]
        pub(crate) use log::{debug, error, info, trace, warn};
    }
}
