//! Baud rate divisor calculation
//!
//! The divisor depends on the kernel clock feeding the peripheral (selected per peripheral in
//! `RCC_CCIPR`), on whether the peripheral is the LPUART, and for the other U(S)ARTs on the
//! oversampling mode currently set in CR1.
use crate::mmio::RegisterBus;
use crate::rcc::{self, Clocks};
use crate::serial::board::{PinWiring, PortDescriptor};
use crate::serial::config::{HAS_LPUART_PRESC, LPUART_CLOCK_DIV_FACTOR, LPUART_PRESCALER};
use crate::serial::usart::UsartRegs;
use crate::stm32::usart;
use crate::time::{Bps, Hertz};

/// Divisor encoding family
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartKind {
    /// USART/UART, 8x or 16x oversampling
    Usart,
    /// LPUART, 256x clock multiplier
    LowPower,
}

impl From<&PortDescriptor> for UartKind {
    fn from(port: &PortDescriptor) -> Self {
        if port.is_low_power() {
            UartKind::LowPower
        } else {
            UartKind::Usart
        }
    }
}

/// Oversampling mode of a USART
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversampling {
    By16,
    By8,
}

/// Division rounding half up
#[inline]
pub const fn div_round(num: u64, den: u64) -> u64 {
    (num + den / 2) / den
}

/// BRR value for `baud` given a kernel clock of `clk`
pub fn brr_value(kind: UartKind, clk: Hertz, baud: Bps, oversampling: Oversampling) -> u32 {
    let clk = clk.raw() as u64;
    let baud = baud.raw() as u64;
    match (kind, oversampling) {
        (UartKind::LowPower, _) => {
            div_round((clk / LPUART_CLOCK_DIV_FACTOR as u64) * 256, baud) as u32
        }
        (UartKind::Usart, Oversampling::By8) => {
            let usartdiv = div_round(clk * 2, baud) as u32;
            // BRR[3] must stay clear, BRR[2:0] holds USARTDIV[3:0] >> 1
            (usartdiv & 0xFFF0) | ((usartdiv & 0xF) >> 1)
        }
        (UartKind::Usart, Oversampling::By16) => div_round(clk, baud) as u32,
    }
}

/// Resolves the kernel clock of the port, programs BRR and returns the value written.
///
/// The LPUART prescaler, where present, is reset to DIV1 first.
pub(crate) fn program<B: RegisterBus>(
    usart: &UsartRegs<'_, B>,
    port: &PortDescriptor,
    wiring: &PinWiring,
    clocks: &Clocks,
    baud: Bps,
) -> u32 {
    let kind = UartKind::from(port);
    let clk = rcc::usart_clock_source(usart.bus(), wiring.srcindex).frequency(clocks, wiring.bus);

    let oversampling = match kind {
        UartKind::LowPower => {
            if HAS_LPUART_PRESC {
                usart.modify(usart::PRESC, usart::PRESC_PRESCALER, LPUART_PRESCALER);
            }
            Oversampling::By16
        }
        UartKind::Usart if usart.read(usart::CR1) & usart::CR1_OVER8 != 0 => Oversampling::By8,
        UartKind::Usart => Oversampling::By16,
    };

    let brr = brr_value(kind, clk, baud, oversampling);
    usart.write(usart::BRR, brr);
    brr
}
