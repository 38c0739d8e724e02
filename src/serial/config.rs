//! Compile-time configuration of the serial ports
use crate::gpio::Speed;
use crate::stm32::usart;
use crate::time::Bps;

/// Line speed every port is programmed for
pub const BAUD_RATE: Bps = Bps(115_200);

/// Number of serial ports in the descriptor tables
pub const TNUM_SIOP: usize = 2;

/// GPIO speed class of the port 1 pins
pub const U1_GPIO_SPEED: Speed = Speed::High;

/// GPIO speed class of the port 2 pins
pub const U2_GPIO_SPEED: Speed = Speed::High;

/// Whether the LPUART carries the PRESC register
pub const HAS_LPUART_PRESC: bool = cfg!(feature = "lpuart-presc");

/// LPUART kernel clock prescaler value (DIV1)
pub const LPUART_PRESCALER: u32 = 0;

/// Division factor matching [`LPUART_PRESCALER`]
pub const LPUART_CLOCK_DIV_FACTOR: u32 = 1;

/// How long the receive error path waits before logging, in microseconds
pub const ERROR_LOG_SETTLE_US: u32 = 100;

// Frame format: 8 data bits, no parity, 1 stop bit, no flow control.

/// CR1 fields rewritten on every bring-up
pub const CR1_CLEAR_MASK: u32 =
    usart::CR1_M | usart::CR1_PCE | usart::CR1_PS | usart::CR1_TE | usart::CR1_RE;

/// 8 data bits, parity off, receiver and transmitter on
pub const CR1_FRAME: u32 = usart::CR1_RE | usart::CR1_TE;

/// One stop bit
pub const CR2_STOP_1: u32 = 0;

/// CR3 flow control fields
pub const CR3_CLEAR_MASK: u32 = usart::CR3_RTSE | usart::CR3_CTSE;

/// No hardware flow control
pub const CR3_FLOW_NONE: u32 = 0;
