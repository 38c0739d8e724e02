//! Kernel services consumed by the serial driver
//!
//! The driver does not own the interrupt controller or a timer. The kernel hands it an
//! implementation of [`Kernel`] that masks and unmasks interrupt lines and provides a short
//! delay.
//!
//! Every method takes `&self`: the delay is called from the receive interrupt path, which must
//! not hold a critical section while it waits.

/// Interrupt line identity (NVIC position)
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Irq(pub u16);

impl Irq {
    pub const fn number(self) -> u16 {
        self.0
    }
}

/// Interrupt masking and delay primitives supplied by the kernel
pub trait Kernel {
    type Error: core::fmt::Debug;

    /// Unmasks `irq`.
    fn enable_interrupt(&self, irq: Irq) -> Result<(), Self::Error>;

    /// Masks `irq`.
    fn disable_interrupt(&self, irq: Irq);

    /// Waits at least `us` microseconds without masking interrupts.
    fn delay_us(&self, us: u32);
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub use self::nvic::NvicKernel;

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod nvic {
    use super::{Irq, Kernel};
    use crate::rcc::Clocks;
    use core::convert::Infallible;
    use cortex_m::interrupt::InterruptNumber;
    use cortex_m::peripheral::NVIC;
    use embedded_hal::delay::DelayNs;

    // SAFETY: `Irq` only ever carries positions from the device's vector table
    unsafe impl InterruptNumber for Irq {
        #[inline(always)]
        fn number(self) -> u16 {
            self.0
        }
    }

    /// [`Kernel`] backed directly by the Cortex-M NVIC, delaying by counting core cycles
    pub struct NvicKernel {
        cycles_per_us: u32,
    }

    impl NvicKernel {
        pub fn new(clocks: &Clocks) -> Self {
            NvicKernel {
                cycles_per_us: (clocks.ahb_clk.raw() / 1_000_000).max(1),
            }
        }

        fn spin(&self, ns: u32) {
            let cycles = (ns as u64 * self.cycles_per_us as u64).div_ceil(1_000);
            cortex_m::asm::delay(cycles.min(u32::MAX as u64) as u32);
        }
    }

    impl DelayNs for NvicKernel {
        fn delay_ns(&mut self, ns: u32) {
            self.spin(ns)
        }
    }

    impl Kernel for NvicKernel {
        type Error = Infallible;

        fn enable_interrupt(&self, irq: Irq) -> Result<(), Infallible> {
            // NOTE(unsafe) the serial ISR is installed before any port is opened
            unsafe { NVIC::unmask(irq) };
            Ok(())
        }

        fn disable_interrupt(&self, irq: Irq) {
            NVIC::mask(irq);
        }

        fn delay_us(&self, us: u32) {
            for _ in 0..us {
                self.spin(1_000);
            }
        }
    }
}
