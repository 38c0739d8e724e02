mod common;

use std::cell::Cell;
use std::convert::Infallible;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use common::{clocks_8mhz, FakeBus, FakeKernel, Notification, Recorder};
use stm32l4xx_sio::stm32::{base, usart};
use stm32l4xx_sio::time::U32Ext;
use stm32l4xx_sio::{Callback, Irq, Kernel, PortId, Sio};

const CR1: u32 = base::USART2 + usart::CR1;
const CR3: u32 = base::USART2 + usart::CR3;
const ISR: u32 = base::USART2 + usart::ISR;
const RDR: u32 = base::USART2 + usart::RDR;

type TestSio = Sio<FakeBus, FakeKernel, Recorder>;

fn opened() -> (TestSio, FakeBus, FakeKernel, Recorder) {
    let bus = FakeBus::new();
    let kernel = FakeKernel::new();
    let recorder = Recorder::new();
    let mut sio = Sio::new(bus.clone(), kernel.clone(), recorder.clone(), clocks_8mhz())
        .baud_rate(9600.bps());
    sio.open(PortId::Port1, 0xC0);
    bus.reset_counters();
    (sio, bus, kernel, recorder)
}

#[test]
fn receive_error_is_dropped_and_logged() {
    let (sio, bus, kernel, _) = opened();
    bus.poke(ISR, usart::ISR_ORE | usart::ISR_RXNE);
    bus.poke(RDR, 0x1FF);

    assert!(!sio.receive_ready(PortId::Port1));

    assert_eq!(bus.reads_of(RDR), 1);
    assert_eq!(bus.peek(CR3) & usart::CR3_EIE, 0);
    assert_eq!(kernel.delayed_us(), 100);
    // receive interrupt itself stays on
    assert_ne!(bus.peek(CR1) & usart::CR1_RXNEIE, 0);
}

#[test]
fn every_error_flag_is_caught() {
    for flag in [
        usart::ISR_PE,
        usart::ISR_FE,
        usart::ISR_NF,
        usart::ISR_ORE,
    ] {
        let (sio, bus, _, _) = opened();
        bus.poke(ISR, flag | usart::ISR_RXNE);
        assert_eq!(sio.try_receive(PortId::Port1), None, "ISR {:#x}", flag);
        assert_eq!(bus.reads_of(RDR), 1);
    }
}

#[test]
fn error_interrupt_stays_off_until_reopen() {
    let (mut sio, bus, _, _) = opened();
    bus.poke(ISR, usart::ISR_FE);
    sio.receive_ready(PortId::Port1);

    sio.enable_callback(PortId::Port1, Callback::SendReady);
    sio.disable_callback(PortId::Port1, Callback::ReceiveReady);
    assert_eq!(bus.peek(CR3) & usart::CR3_EIE, 0);

    sio.open(PortId::Port1, 0xC0);
    assert_ne!(bus.peek(CR3) & usart::CR3_EIE, 0);
}

#[test]
fn receive_is_served_before_send() {
    let (sio, bus, _, recorder) = opened();
    sio.enable_callback(PortId::Port1, Callback::SendReady);
    bus.poke(ISR, usart::ISR_RXNE | usart::ISR_TC | usart::ISR_TXE);

    sio.isr(PortId::Port1);

    assert_eq!(
        recorder.take(),
        [
            Notification::ReceiveReady(0xC0),
            Notification::SendReady(0xC0)
        ]
    );
}

#[test]
fn disabled_callbacks_stay_silent() {
    let (sio, bus, _, recorder) = opened();
    sio.disable_callback(PortId::Port1, Callback::ReceiveReady);
    bus.poke(ISR, usart::ISR_RXNE | usart::ISR_TC);

    sio.isr(PortId::Port1);

    assert!(recorder.take().is_empty());
    assert!(!sio.send_ready(PortId::Port1));
    assert!(!sio.receive_ready(PortId::Port1));
}

#[test]
fn isr_on_error_only_notifies_send() {
    let (sio, bus, _, recorder) = opened();
    sio.enable_callback(PortId::Port1, Callback::SendReady);
    bus.poke(ISR, usart::ISR_NF | usart::ISR_RXNE | usart::ISR_TC);

    sio.isr(PortId::Port1);

    assert_eq!(recorder.take(), [Notification::SendReady(0xC0)]);
}

#[test]
fn callback_switches_touch_only_their_bit() {
    let (sio, bus, _, _) = opened();
    let before = bus.peek(CR1);
    let cr3 = bus.peek(CR3);

    sio.enable_callback(PortId::Port1, Callback::SendReady);
    assert_eq!(bus.peek(CR1), before | usart::CR1_TXEIE);

    sio.disable_callback(PortId::Port1, Callback::ReceiveReady);
    assert_eq!(
        bus.peek(CR1),
        (before | usart::CR1_TXEIE) & !usart::CR1_RXNEIE
    );

    sio.disable_callback(PortId::Port1, Callback::SendReady);
    sio.enable_callback(PortId::Port1, Callback::ReceiveReady);
    assert_eq!(bus.peek(CR1), before);
    assert_eq!(bus.peek(CR3), cr3);
}

/// Kernel whose delay checks whether another context can enter a critical section meanwhile
#[derive(Default)]
struct ContendedKernel {
    others_ran: Cell<Option<bool>>,
}

impl Kernel for ContendedKernel {
    type Error = Infallible;

    fn enable_interrupt(&self, _irq: Irq) -> Result<(), Infallible> {
        Ok(())
    }

    fn disable_interrupt(&self, _irq: Irq) {}

    fn delay_us(&self, _us: u32) {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            critical_section::with(|_| {
                let _ = tx.send(());
            })
        });
        let entered = rx.recv_timeout(Duration::from_secs(2)).is_ok();
        self.others_ran.set(Some(entered));
    }
}

#[test]
fn error_delay_leaves_interrupts_enabled() {
    let bus = FakeBus::new();
    let mut sio = Sio::new(
        bus.clone(),
        ContendedKernel::default(),
        Recorder::new(),
        clocks_8mhz(),
    );
    sio.open(PortId::Port1, 0);
    bus.poke(ISR, usart::ISR_FE | usart::ISR_RXNE);

    assert!(!sio.receive_ready(PortId::Port1));

    let (_, kernel, _) = sio.release();
    assert_eq!(kernel.others_ran.get(), Some(true));
}
