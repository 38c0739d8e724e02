use crate::interrupt::Kernel;
use crate::logger::{debug, warn};
use crate::mmio::RegisterBus;
use crate::rcc::Clocks;
use crate::serial::baud;
use crate::serial::board::{PinWiring, PortDescriptor, PortId, PORT_TABLE, WIRING_TABLE};
use crate::serial::config::*;
use crate::stm32::usart;
use crate::time::{self, Bps};

/// Serial line error
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// RX buffer overrun
    Overrun,
    /// Noise error
    Noise,
    /// Framing error
    Framing,
    /// Parity check error
    Parity,
}

impl Error {
    /// Decodes the first error flag set in an ISR value
    pub const fn from_isr(isr: u32) -> Option<Error> {
        if isr & usart::ISR_ORE != 0 {
            Some(Error::Overrun)
        } else if isr & usart::ISR_NF != 0 {
            Some(Error::Noise)
        } else if isr & usart::ISR_FE != 0 {
            Some(Error::Framing)
        } else if isr & usart::ISR_PE != 0 {
            Some(Error::Parity)
        } else {
            None
        }
    }
}

/// Upper-layer notification selected by [`Sio::enable_callback`] / [`Sio::disable_callback`]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    /// Transmit data register can take a byte (CR1.TXEIE)
    SendReady,
    /// A byte has been received (CR1.RXNEIE)
    ReceiveReady,
}

impl Callback {
    const fn cr1_bit(self) -> u32 {
        match self {
            Callback::SendReady => usart::CR1_TXEIE,
            Callback::ReceiveReady => usart::CR1_RXNEIE,
        }
    }
}

/// Notifications raised from [`Sio::isr`]
///
/// `exinf` is the value the port was opened with.
pub trait SioHandler {
    fn receive_ready(&self, exinf: usize);

    fn send_ready(&self, exinf: usize);
}

/// Register block of one U(S)ART
pub(crate) struct UsartRegs<'a, B> {
    bus: &'a B,
    base: u32,
}

impl<'a, B: RegisterBus> UsartRegs<'a, B> {
    pub(crate) fn new(bus: &'a B, base: u32) -> Self {
        UsartRegs { bus, base }
    }

    pub(crate) fn bus(&self) -> &'a B {
        self.bus
    }

    #[inline]
    pub(crate) fn read(&self, reg: u32) -> u32 {
        self.bus.read32(self.base + reg)
    }

    #[inline]
    pub(crate) fn write(&self, reg: u32, val: u32) {
        self.bus.write32(self.base + reg, val)
    }

    #[inline]
    pub(crate) fn set(&self, reg: u32, mask: u32) {
        self.bus.or32(self.base + reg, mask)
    }

    #[inline]
    pub(crate) fn clear(&self, reg: u32, mask: u32) {
        self.bus.and32(self.base + reg, mask)
    }

    #[inline]
    pub(crate) fn modify(&self, reg: u32, mask: u32, value: u32) {
        self.bus.modify32(self.base + reg, mask, value)
    }

    #[inline]
    pub(crate) fn read_data(&self) -> u16 {
        self.bus.read16(self.base + usart::RDR)
    }

    #[inline]
    pub(crate) fn write_data(&self, data: u16) {
        self.bus.write16(self.base + usart::TDR, data)
    }
}

/// Driver state of one port
#[derive(Debug)]
pub struct PortState {
    port: &'static PortDescriptor,
    wiring: &'static PinWiring,
    exinf: usize,
    opened: bool,
}

impl PortState {
    fn new(port: &'static PortDescriptor, wiring: &'static PinWiring) -> Self {
        PortState {
            port,
            wiring,
            exinf: 0,
            opened: false,
        }
    }

    pub fn descriptor(&self) -> &'static PortDescriptor {
        self.port
    }

    pub fn wiring(&self) -> &'static PinWiring {
        self.wiring
    }

    /// Value passed to the last `open`
    pub fn exinf(&self) -> usize {
        self.exinf
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }
}

/// Serial I/O driver for all ports of the board
///
/// `open` and `close` take `&mut self` and belong to task context. Everything the interrupt
/// path needs (`isr`, the ready predicates, `try_send`, `try_receive` and the callback
/// switches) takes `&self`, so the handler may call back into the driver while `isr` runs.
pub struct Sio<B, K, H> {
    bus: B,
    kernel: K,
    handler: H,
    clocks: Clocks,
    baud: Bps,
    ports: [PortState; TNUM_SIOP],
}

impl<B, K, H> Sio<B, K, H>
where
    B: RegisterBus,
    K: Kernel,
    H: SioHandler,
{
    /// Builds the driver over the default board tables. All ports start closed.
    pub fn new(bus: B, kernel: K, handler: H, clocks: Clocks) -> Self {
        Sio {
            bus,
            kernel,
            handler,
            clocks,
            baud: BAUD_RATE,
            ports: Self::port_states(&PORT_TABLE, &WIRING_TABLE),
        }
    }

    /// Replaces the descriptor tables. All ports start closed.
    pub fn tables(
        mut self,
        ports: &'static [PortDescriptor; TNUM_SIOP],
        wiring: &'static [PinWiring; TNUM_SIOP],
    ) -> Self {
        self.ports = Self::port_states(ports, wiring);
        self
    }

    /// Overrides [`BAUD_RATE`]
    pub fn baud_rate(mut self, baud: Bps) -> Self {
        self.baud = baud;
        self
    }

    fn port_states(
        ports: &'static [PortDescriptor; TNUM_SIOP],
        wiring: &'static [PinWiring; TNUM_SIOP],
    ) -> [PortState; TNUM_SIOP] {
        core::array::from_fn(|i| PortState::new(&ports[i], &wiring[i]))
    }

    pub fn state(&self, id: PortId) -> &PortState {
        &self.ports[id.index()]
    }

    pub fn is_open(&self, id: PortId) -> bool {
        self.state(id).opened
    }

    pub fn clocks(&self) -> &Clocks {
        &self.clocks
    }

    pub fn baud(&self) -> Bps {
        self.baud
    }

    /// Releases the bus, the kernel services and the handler
    pub fn release(self) -> (B, K, H) {
        (self.bus, self.kernel, self.handler)
    }

    fn usart(&self, id: PortId) -> UsartRegs<'_, B> {
        UsartRegs::new(&self.bus, self.state(id).port.base)
    }

    /// Clocks, pins, frame format and divisor. Leaves UE clear.
    ///
    /// Returns `None` when the port has no pins, without touching the hardware.
    fn bring_up(&self, id: PortId) -> Option<UsartRegs<'_, B>> {
        let state = self.state(id);
        let wiring = state.wiring;
        let (tx, rx) = wiring.pins()?;

        wiring.clock.set(&self.bus);
        wiring.gpio_clock.set(&self.bus);
        tx.configure(&self.bus);
        rx.configure(&self.bus);
        tx.set_alternate_function(&self.bus, wiring.af);
        rx.set_alternate_function(&self.bus, wiring.af);

        let usart = self.usart(id);
        usart.clear(usart::CR1, usart::CR1_UE);
        usart.modify(usart::CR1, CR1_CLEAR_MASK, CR1_FRAME);
        usart.modify(usart::CR2, usart::CR2_STOP, CR2_STOP_1);
        usart.modify(usart::CR3, CR3_CLEAR_MASK, CR3_FLOW_NONE);
        baud::program(&usart, state.port, wiring, &self.clocks, self.baud);

        Some(usart)
    }

    /// Opens `id`, remembering `exinf` for the callbacks.
    ///
    /// Reopening an open port runs the whole configuration again but leaves its interrupt line
    /// alone. A port without pins is left untouched.
    ///
    /// # Panics
    ///
    /// If the kernel fails to unmask the port's interrupt.
    pub fn open(&mut self, id: PortId, exinf: usize) -> PortId {
        let state = &mut self.ports[id.index()];
        let was_open = state.opened;
        state.exinf = exinf;

        if state.wiring.pins().is_none() {
            debug!("sio: port {} has no pins, not opened", id.siopid());
            return id;
        }

        let this = &*self;
        let irq = this.state(id).port.irq;
        let configured = critical_section::with(|_| {
            let Some(usart) = this.bring_up(id) else {
                return false;
            };
            usart.set(usart::CR3, usart::CR3_EIE);
            usart.set(usart::CR1, usart::CR1_PEIE | usart::CR1_RXNEIE);

            if !was_open {
                let result = this.kernel.enable_interrupt(irq);
                assert!(result.is_ok(), "sio: cannot unmask irq {}", irq.number());
            }
            usart.set(usart::CR1, usart::CR1_UE);
            true
        });

        if configured {
            self.ports[id.index()].opened = true;
            debug!("sio: port {} open, irq {}", id.siopid(), irq.number());
        }
        id
    }

    /// Closes `id`. Closing a closed port does nothing.
    pub fn close(&mut self, id: PortId) {
        let state = self.state(id);
        if state.opened {
            let irq = state.port.irq;
            critical_section::with(|_| self.kernel.disable_interrupt(irq));
            self.usart(id).clear(usart::CR1, usart::CR1_UE);
            state.wiring.clock.clear(&self.bus);
            debug!("sio: port {} closed", id.siopid());
        }
        self.ports[id.index()].opened = false;
    }

    /// Console bring-up for use before the kernel runs.
    ///
    /// Releases the peripheral from reset, configures it exactly as `open` does, leaves the
    /// transmit and receive interrupts disabled and enables the peripheral. The interrupt line
    /// and the open flag are not touched.
    pub fn early_init(&self, id: PortId) {
        let wiring = self.state(id).wiring;
        if wiring.pins().is_none() {
            return;
        }

        wiring.reset.clear(&self.bus);
        critical_section::with(|_| {
            if let Some(usart) = self.bring_up(id) {
                usart.clear(usart::CR1, usart::CR1_TXEIE | usart::CR1_RXNEIE);
                usart.set(usart::CR1, usart::CR1_UE);
            }
        });
    }

    /// Transmit interrupt enabled and transmission complete
    pub fn send_ready(&self, id: PortId) -> bool {
        let usart = self.usart(id);
        let cr1 = usart.read(usart::CR1);
        let isr = usart.read(usart::ISR);
        cr1 & usart::CR1_TXEIE != 0 && isr & usart::ISR_TC != 0
    }

    /// Receive interrupt enabled and a byte waiting.
    ///
    /// A pending line error is handled here instead: the error interrupt is switched off until
    /// the next `open`, the damaged byte is read and dropped, and the error is logged.
    pub fn receive_ready(&self, id: PortId) -> bool {
        let usart = self.usart(id);
        let cr1 = usart.read(usart::CR1);
        let isr = usart.read(usart::ISR);

        if let Some(error) = Error::from_isr(isr) {
            usart.clear(usart::CR3, usart::CR3_EIE);
            let _ = usart.read_data();
            self.kernel.delay_us(ERROR_LOG_SETTLE_US);
            warn!(
                "sio: receive error {:?} on irq {}, isr {:#x}",
                error,
                self.state(id).port.irq.number(),
                isr
            );
            return false;
        }

        cr1 & usart::CR1_RXNEIE != 0 && isr & usart::ISR_RXNE != 0
    }

    /// Last written byte has left the shift register
    pub fn is_tx_complete(&self, id: PortId) -> bool {
        self.usart(id).read(usart::ISR) & usart::ISR_TC != 0
    }

    /// Interrupt service routine of port `id`. Receive is served before send.
    pub fn isr(&self, id: PortId) {
        let exinf = self.state(id).exinf;
        if self.receive_ready(id) {
            self.handler.receive_ready(exinf);
        }
        if self.send_ready(id) {
            self.handler.send_ready(exinf);
        }
    }

    /// Writes `byte` if the port is ready to send
    pub fn try_send(&self, id: PortId, byte: u8) -> bool {
        if self.send_ready(id) {
            self.usart(id).write_data(byte as u16);
            true
        } else {
            false
        }
    }

    /// Takes the received byte, if there is one
    pub fn try_receive(&self, id: PortId) -> Option<u8> {
        if self.receive_ready(id) {
            Some((self.usart(id).read_data() & 0xFF) as u8)
        } else {
            None
        }
    }

    pub fn enable_callback(&self, id: PortId, callback: Callback) {
        let usart = self.usart(id);
        // NOTE critical section prevents races with the ISR
        critical_section::with(|_| usart.set(usart::CR1, callback.cr1_bit()));
    }

    pub fn disable_callback(&self, id: PortId, callback: Callback) {
        let usart = self.usart(id);
        // NOTE critical section prevents races with the ISR
        critical_section::with(|_| usart.clear(usart::CR1, callback.cr1_bit()));
    }

    /// Sends `byte` without interrupts and waits for the line to go idle.
    ///
    /// Must not be mixed with interrupt driven sending on the same port.
    pub fn polling_send(&self, byte: u8, id: PortId) {
        let usart = self.usart(id);
        usart.write_data(byte as u16);
        while usart.read(usart::ISR) & usart::ISR_TC == 0 {}

        for _ in 0..time::cycles_per_bit(self.clocks.sys_clk, self.baud) {
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_priority_follows_isr_bits() {
        assert_eq!(Error::from_isr(usart::ISR_RXNE | usart::ISR_TC), None);
        assert_eq!(Error::from_isr(usart::ISR_PE), Some(Error::Parity));
        assert_eq!(Error::from_isr(usart::ISR_FE | usart::ISR_PE), Some(Error::Framing));
        assert_eq!(Error::from_isr(usart::ISR_ORE | usart::ISR_NF), Some(Error::Overrun));
    }
}
