//! Reset and clock control
//!
//! The serial driver never configures oscillators or PLLs. It is handed the frozen [`Clocks`]
//! and only gates peripheral clocks on and off and reads the U(S)ART kernel clock mux.
use crate::mmio::RegisterBus;
use crate::stm32::{base, rcc};
use crate::time::{Hertz, RateExtU32};

/// HSI16 speed
pub const HSI_FREQ: u32 = 16_000_000;

/// LSE crystal speed
pub const LSE_FREQ: u32 = 32_768;

/// Clock frequencies
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clocks {
    /// System frequency
    pub sys_clk: Hertz,
    /// AHB frequency
    pub ahb_clk: Hertz,
    /// APB1 frequency
    pub apb1_clk: Hertz,
    /// APB2 frequency
    pub apb2_clk: Hertz,
}

impl Clocks {
    /// Clock tree running every bus straight from `sys_clk`
    pub fn undivided(sys_clk: Hertz) -> Self {
        Clocks {
            sys_clk,
            ahb_clk: sys_clk,
            apb1_clk: sys_clk,
            apb2_clk: sys_clk,
        }
    }
}

/// Reset state: MSI at 4 MHz, no prescalers
impl Default for Clocks {
    fn default() -> Clocks {
        Clocks::undivided(4.MHz())
    }
}

/// Peripheral bus a U(S)ART hangs off
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralBus {
    APB1,
    APB2,
}

impl PeripheralBus {
    pub fn get_frequency(self, clocks: &Clocks) -> Hertz {
        match self {
            PeripheralBus::APB1 => clocks.apb1_clk,
            PeripheralBus::APB2 => clocks.apb2_clk,
        }
    }
}

/// U(S)ART Clock Source
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum USARTClkSrc {
    APB,
    SYSCLK,
    HSI,
    LSE,
}

impl USARTClkSrc {
    /// Decodes the 2-bit selector found in CCIPR
    pub const fn from_bits(bits: u32) -> Self {
        match bits & rcc::CCIPR_USARTSEL {
            0b01 => USARTClkSrc::SYSCLK,
            0b10 => USARTClkSrc::HSI,
            0b11 => USARTClkSrc::LSE,
            _ => USARTClkSrc::APB,
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            USARTClkSrc::APB => 0b00,
            USARTClkSrc::SYSCLK => 0b01,
            USARTClkSrc::HSI => 0b10,
            USARTClkSrc::LSE => 0b11,
        }
    }

    /// Kernel clock frequency delivered by this source to a peripheral on `bus`
    pub fn frequency(self, clocks: &Clocks, bus: PeripheralBus) -> Hertz {
        match self {
            USARTClkSrc::SYSCLK => clocks.sys_clk,
            USARTClkSrc::HSI => HSI_FREQ.Hz(),
            USARTClkSrc::LSE => LSE_FREQ.Hz(),
            USARTClkSrc::APB => bus.get_frequency(clocks),
        }
    }
}

/// Reads the kernel clock source selected for the U(S)ART whose selector sits at `srcindex`
pub fn usart_clock_source<B: RegisterBus>(bus: &B, srcindex: u32) -> USARTClkSrc {
    USARTClkSrc::from_bits(bus.read32(base::RCC + rcc::CCIPR) >> srcindex)
}

/// One enable or reset bit in an RCC register
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockGate {
    /// Absolute register address
    pub reg: u32,
    pub bit: u32,
}

impl ClockGate {
    pub const fn new(offset: u32, bit: u32) -> Self {
        ClockGate {
            reg: base::RCC + offset,
            bit,
        }
    }

    pub fn set<B: RegisterBus>(&self, bus: &B) {
        bus.or32(self.reg, self.bit);
    }

    pub fn clear<B: RegisterBus>(&self, bus: &B) {
        bus.and32(self.reg, self.bit);
    }
}
