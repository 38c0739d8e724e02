//! Serial I/O port driver
//!
//! Interrupt-driven byte transfer over the U(S)ART and LPUART peripherals, for use underneath a
//! kernel's serial service. The frame format is fixed at 8N1 without flow control.
//!
//! The kernel opens ports with [`Sio::open`], routes each port's interrupt to [`Sio::isr`], and
//! receives [`SioHandler`] notifications from there. Inside those notifications it moves data
//! with [`Sio::try_send`] / [`Sio::try_receive`] and throttles them with
//! [`Sio::enable_callback`] / [`Sio::disable_callback`]. [`Sio::early_init`] and
//! [`Sio::polling_send`] serve a console before interrupts are up.
//!
//! **Note that the kernel clock needs to be at least 16 times faster than the baud rate for all
//! U(S)ARTs except for the LPUART** (8 times with 8x oversampling). The latter contains an
//! internal 256x clock multiplier.
pub mod baud;
pub mod board;
pub mod config;
pub mod port;
pub mod usart;

pub use board::{PinWiring, PortDescriptor, PortId};
pub use port::SioPort;
pub use usart::{Callback, Error, PortState, Sio, SioHandler};
