//! Serial I/O (SIO) port driver for STM32L4 U(S)ART and LPUART peripherals
//!
//! The driver sits between a real-time kernel's serial service and the hardware. It owns the
//! peripheral configuration (clock gates, pin multiplexing, baud rate), the open/close
//! lifecycle of each port, and the interrupt-driven byte protocol. All hardware access goes
//! through a [`mmio::RegisterBus`], so the driver runs unchanged against a test double on the
//! host.
#![cfg_attr(not(test), no_std)]

pub extern crate nb;

pub use embedded_hal as hal;
pub use embedded_hal_old as hal_02;
pub use nb::block;

pub mod gpio;
pub mod interrupt;
mod logger;
pub mod mmio;
pub mod rcc;
pub mod serial;
pub mod stm32;
pub mod time;

pub use interrupt::{Irq, Kernel};
pub use mmio::{Mmio, RegisterBus};
pub use serial::{Callback, PortId, Sio, SioHandler};
