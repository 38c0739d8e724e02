//! STM32L4 register map
//!
//! Only the registers and fields the serial driver touches are listed. Offsets and bit positions
//! follow RM0351.

/// Peripheral base addresses
pub mod base {
    pub const RCC: u32 = 0x4002_1000;

    pub const GPIOA: u32 = 0x4800_0000;
    pub const GPIOB: u32 = 0x4800_0400;
    pub const GPIOC: u32 = 0x4800_0800;

    pub const USART1: u32 = 0x4001_3800;
    pub const USART2: u32 = 0x4000_4400;
    pub const USART3: u32 = 0x4000_4800;
    pub const LPUART1: u32 = 0x4000_8000;
}

/// Interrupt numbers (NVIC position)
pub mod irq {
    pub const USART1: u16 = 37;
    pub const USART2: u16 = 38;
    pub const USART3: u16 = 39;
    pub const LPUART1: u16 = 70;
}

/// Reset and clock control
pub mod rcc {
    pub const APB1RSTR1: u32 = 0x38;
    pub const APB1RSTR2: u32 = 0x3C;
    pub const APB2RSTR: u32 = 0x40;
    pub const AHB2ENR: u32 = 0x4C;
    pub const APB1ENR1: u32 = 0x58;
    pub const APB1ENR2: u32 = 0x5C;
    pub const APB2ENR: u32 = 0x60;
    pub const CCIPR: u32 = 0x88;

    pub const AHB2ENR_GPIOAEN: u32 = 1 << 0;
    pub const AHB2ENR_GPIOBEN: u32 = 1 << 1;
    pub const AHB2ENR_GPIOCEN: u32 = 1 << 2;

    pub const APB1ENR1_USART2EN: u32 = 1 << 17;
    pub const APB1ENR1_USART3EN: u32 = 1 << 18;
    pub const APB1ENR2_LPUART1EN: u32 = 1 << 0;
    pub const APB2ENR_USART1EN: u32 = 1 << 14;

    pub const APB1RSTR1_USART2RST: u32 = 1 << 17;
    pub const APB1RSTR1_USART3RST: u32 = 1 << 18;
    pub const APB1RSTR2_LPUART1RST: u32 = 1 << 0;
    pub const APB2RSTR_USART1RST: u32 = 1 << 14;

    /// Width mask of one U(S)ART kernel clock selector in CCIPR
    pub const CCIPR_USARTSEL: u32 = 0b11;
    pub const CCIPR_USART1SEL_POS: u32 = 0;
    pub const CCIPR_USART2SEL_POS: u32 = 2;
    pub const CCIPR_USART3SEL_POS: u32 = 4;
    pub const CCIPR_LPUART1SEL_POS: u32 = 10;
}

/// General purpose I/O
pub mod gpio {
    pub const MODER: u32 = 0x00;
    pub const OTYPER: u32 = 0x04;
    pub const OSPEEDR: u32 = 0x08;
    pub const PUPDR: u32 = 0x0C;
    pub const AFRL: u32 = 0x20;
    pub const AFRH: u32 = 0x24;
}

/// U(S)ART and LPUART
pub mod usart {
    pub const CR1: u32 = 0x00;
    pub const CR2: u32 = 0x04;
    pub const CR3: u32 = 0x08;
    pub const BRR: u32 = 0x0C;
    pub const ISR: u32 = 0x1C;
    pub const ICR: u32 = 0x20;
    pub const RDR: u32 = 0x24;
    pub const TDR: u32 = 0x28;
    pub const PRESC: u32 = 0x2C;

    pub const CR1_UE: u32 = 1 << 0;
    pub const CR1_RE: u32 = 1 << 2;
    pub const CR1_TE: u32 = 1 << 3;
    pub const CR1_RXNEIE: u32 = 1 << 5;
    pub const CR1_TCIE: u32 = 1 << 6;
    pub const CR1_TXEIE: u32 = 1 << 7;
    pub const CR1_PEIE: u32 = 1 << 8;
    pub const CR1_PS: u32 = 1 << 9;
    pub const CR1_PCE: u32 = 1 << 10;
    pub const CR1_M0: u32 = 1 << 12;
    pub const CR1_OVER8: u32 = 1 << 15;
    pub const CR1_M1: u32 = 1 << 28;
    pub const CR1_M: u32 = CR1_M0 | CR1_M1;

    pub const CR2_STOP: u32 = 0b11 << 12;

    pub const CR3_EIE: u32 = 1 << 0;
    pub const CR3_RTSE: u32 = 1 << 8;
    pub const CR3_CTSE: u32 = 1 << 9;

    pub const ISR_PE: u32 = 1 << 0;
    pub const ISR_FE: u32 = 1 << 1;
    pub const ISR_NF: u32 = 1 << 2;
    pub const ISR_ORE: u32 = 1 << 3;
    pub const ISR_RXNE: u32 = 1 << 5;
    pub const ISR_TC: u32 = 1 << 6;
    pub const ISR_TXE: u32 = 1 << 7;
    pub const ISR_ERRORS: u32 = ISR_ORE | ISR_NF | ISR_FE | ISR_PE;

    pub const PRESC_PRESCALER: u32 = 0xF;
}
