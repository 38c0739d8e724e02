//! Rates and baudrates
pub use fugit::{HertzU32 as Hertz, RateExtU32};

/// Baudrate, built with [`U32Ext::bps`]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Eq, PartialEq, PartialOrd, Clone, Copy)]
pub struct Bps(pub(crate) u32);

impl Bps {
    /// Raw bits per second
    pub const fn raw(self) -> u32 {
        self.0
    }
}

pub trait U32Ext {
    /// Wrap in `Bps`
    fn bps(self) -> Bps;
}

impl U32Ext for u32 {
    fn bps(self) -> Bps {
        assert!(self > 0);
        Bps(self)
    }
}

/// Number of `clk` cycles that fit into one bit period at `baud`
pub const fn cycles_per_bit(clk: Hertz, baud: Bps) -> u32 {
    clk.raw() / baud.0
}
