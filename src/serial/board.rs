//! Port descriptor tables
//!
//! Two parallel, read-only tables describe the serial ports of the board: [`PORT_TABLE`] names
//! the peripheral and its interrupt, [`WIRING_TABLE`] the clocks and pins it needs. Both are
//! indexed by [`PortId::index`]. The defaults match a NUCLEO-L476RG: port 1 is USART2 on
//! PA2/PA3 (the ST-LINK virtual COM port), port 2 is USART1 on PA9/PA10.
use crate::gpio::{PinConfig, Speed};
use crate::interrupt::Irq;
use crate::rcc::{ClockGate, PeripheralBus};
use crate::serial::config::{TNUM_SIOP, U1_GPIO_SPEED, U2_GPIO_SPEED};
use crate::stm32::{base, irq, rcc};

/// Serial port identifier
///
/// Port numbers are 1-based. The enum is sized to the descriptor tables, so every value indexes
/// them in bounds.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortId {
    Port1 = 1,
    Port2 = 2,
}

impl PortId {
    pub const ALL: [PortId; TNUM_SIOP] = [PortId::Port1, PortId::Port2];

    /// Looks up a 1-based port number
    pub const fn from_siopid(siopid: usize) -> Option<PortId> {
        match siopid {
            1 => Some(PortId::Port1),
            2 => Some(PortId::Port2),
            _ => None,
        }
    }

    /// 1-based port number
    pub const fn siopid(self) -> usize {
        self as usize
    }

    /// Position in the descriptor tables
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

/// Peripheral of one port
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortDescriptor {
    /// U(S)ART register block base address
    pub base: u32,
    pub irq: Irq,
}

impl PortDescriptor {
    /// The LPUART has a 256x clock multiplier in its divisor
    pub const fn is_low_power(&self) -> bool {
        self.base == base::LPUART1
    }
}

/// Clocks and pins of one port
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinWiring {
    /// Peripheral clock enable
    pub clock: ClockGate,
    /// Bus whose PCLK feeds the peripheral when CCIPR selects the APB clock
    pub bus: PeripheralBus,
    /// GPIO block clock enable
    pub gpio_clock: ClockGate,
    /// Peripheral reset
    pub reset: ClockGate,
    /// Alternate function routing the pins to the peripheral
    pub af: u8,
    /// Bit offset of the kernel clock selector in CCIPR
    pub srcindex: u32,
    /// `None` leaves the port unusable; opening it is a no-op
    pub tx: Option<PinConfig>,
    pub rx: Option<PinConfig>,
}

impl PinWiring {
    /// Both pins, if the port has them
    pub const fn pins(&self) -> Option<(PinConfig, PinConfig)> {
        match (self.tx, self.rx) {
            (Some(tx), Some(rx)) => Some((tx, rx)),
            _ => None,
        }
    }
}

pub const USART1_PORT: PortDescriptor = PortDescriptor {
    base: base::USART1,
    irq: Irq(irq::USART1),
};

pub const USART2_PORT: PortDescriptor = PortDescriptor {
    base: base::USART2,
    irq: Irq(irq::USART2),
};

pub const LPUART1_PORT: PortDescriptor = PortDescriptor {
    base: base::LPUART1,
    irq: Irq(irq::LPUART1),
};

/// USART1 on PA9 (TX) / PA10 (RX), AF7
pub const fn usart1_pa9_pa10(speed: Speed) -> PinWiring {
    PinWiring {
        clock: ClockGate::new(rcc::APB2ENR, rcc::APB2ENR_USART1EN),
        bus: PeripheralBus::APB2,
        gpio_clock: ClockGate::new(rcc::AHB2ENR, rcc::AHB2ENR_GPIOAEN),
        reset: ClockGate::new(rcc::APB2RSTR, rcc::APB2RSTR_USART1RST),
        af: 7,
        srcindex: rcc::CCIPR_USART1SEL_POS,
        tx: Some(PinConfig::alternate(base::GPIOA, 9, speed)),
        rx: Some(PinConfig::alternate(base::GPIOA, 10, speed)),
    }
}

/// USART2 on PA2 (TX) / PA3 (RX), AF7
pub const fn usart2_pa2_pa3(speed: Speed) -> PinWiring {
    PinWiring {
        clock: ClockGate::new(rcc::APB1ENR1, rcc::APB1ENR1_USART2EN),
        bus: PeripheralBus::APB1,
        gpio_clock: ClockGate::new(rcc::AHB2ENR, rcc::AHB2ENR_GPIOAEN),
        reset: ClockGate::new(rcc::APB1RSTR1, rcc::APB1RSTR1_USART2RST),
        af: 7,
        srcindex: rcc::CCIPR_USART2SEL_POS,
        tx: Some(PinConfig::alternate(base::GPIOA, 2, speed)),
        rx: Some(PinConfig::alternate(base::GPIOA, 3, speed)),
    }
}

/// LPUART1 on PC1 (TX) / PC0 (RX), AF8
pub const fn lpuart1_pc1_pc0(speed: Speed) -> PinWiring {
    PinWiring {
        clock: ClockGate::new(rcc::APB1ENR2, rcc::APB1ENR2_LPUART1EN),
        bus: PeripheralBus::APB1,
        gpio_clock: ClockGate::new(rcc::AHB2ENR, rcc::AHB2ENR_GPIOCEN),
        reset: ClockGate::new(rcc::APB1RSTR2, rcc::APB1RSTR2_LPUART1RST),
        af: 8,
        srcindex: rcc::CCIPR_LPUART1SEL_POS,
        tx: Some(PinConfig::alternate(base::GPIOC, 1, speed)),
        rx: Some(PinConfig::alternate(base::GPIOC, 0, speed)),
    }
}

/// Wiring of a port whose pins are not brought out on this board
pub const fn unwired(wiring: PinWiring) -> PinWiring {
    PinWiring {
        tx: None,
        rx: None,
        ..wiring
    }
}

pub static PORT_TABLE: [PortDescriptor; TNUM_SIOP] = [USART2_PORT, USART1_PORT];

pub static WIRING_TABLE: [PinWiring; TNUM_SIOP] = [
    usart2_pa2_pa3(U1_GPIO_SPEED),
    usart1_pa9_pa10(U2_GPIO_SPEED),
];
