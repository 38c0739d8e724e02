//! `embedded-hal` view of a single port
use core::convert::Infallible;
use core::fmt;

use embedded_hal_old as hal;
use nb::block;

use crate::interrupt::Kernel;
use crate::mmio::RegisterBus;
use crate::serial::board::PortId;
use crate::serial::usart::{Sio, SioHandler};

/// One port of a [`Sio`], usable through the `embedded-hal` 0.2 serial traits and
/// [`core::fmt::Write`].
///
/// Reads and writes go through the same ready predicates as the interrupt path: writing only
/// makes progress while the send-ready callback is enabled, reading while the receive-ready
/// callback is enabled. Line errors are dropped by the receive predicate, so neither direction
/// ever reports an error.
pub struct SioPort<'a, B, K, H> {
    sio: &'a Sio<B, K, H>,
    id: PortId,
}

impl<B, K, H> Sio<B, K, H>
where
    B: RegisterBus,
    K: Kernel,
    H: SioHandler,
{
    /// Borrows port `id`
    ///
    /// `open` leaves the send-ready callback disabled. Enable [`Callback::SendReady`] before
    /// writing through the returned port, otherwise `write` keeps returning `WouldBlock` and the
    /// [`core::fmt::Write`] impl spins forever.
    ///
    /// [`Callback::SendReady`]: crate::serial::Callback::SendReady
    pub fn port(&self, id: PortId) -> SioPort<'_, B, K, H> {
        SioPort { sio: self, id }
    }
}

impl<B, K, H> SioPort<'_, B, K, H> {
    pub fn id(&self) -> PortId {
        self.id
    }
}

impl<B, K, H> hal::serial::Read<u8> for SioPort<'_, B, K, H>
where
    B: RegisterBus,
    K: Kernel,
    H: SioHandler,
{
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.sio
            .try_receive(self.id)
            .ok_or(nb::Error::WouldBlock)
    }
}

impl<B, K, H> hal::serial::Write<u8> for SioPort<'_, B, K, H>
where
    B: RegisterBus,
    K: Kernel,
    H: SioHandler,
{
    type Error = Infallible;

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.sio.is_tx_complete(self.id) {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if self.sio.try_send(self.id, byte) {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl<B, K, H> fmt::Write for SioPort<'_, B, K, H>
where
    B: RegisterBus,
    K: Kernel,
    H: SioHandler,
{
    /// Blocks on every byte until the port is send-ready, with no timeout.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        use hal::serial::Write;

        let _ = s.as_bytes().iter().map(|c| block!(self.write(*c))).last();
        Ok(())
    }
}
