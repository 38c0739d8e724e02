//! Test doubles shared by the integration tests
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use stm32l4xx_sio::rcc::Clocks;
use stm32l4xx_sio::time::RateExtU32;
use stm32l4xx_sio::{Irq, Kernel, RegisterBus, SioHandler};

/// Register file backed by a map, counting every access
#[derive(Clone, Default)]
pub struct FakeBus(Rc<BusInner>);

#[derive(Default)]
pub struct BusInner {
    regs: RefCell<BTreeMap<u32, u32>>,
    reads: RefCell<BTreeMap<u32, usize>>,
    writes: RefCell<Vec<(u32, u32)>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presets a register without counting the access
    pub fn poke(&self, addr: u32, val: u32) {
        self.0.regs.borrow_mut().insert(addr, val);
    }

    /// Reads a register without counting the access
    pub fn peek(&self, addr: u32) -> u32 {
        self.0.regs.borrow().get(&addr).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> BTreeMap<u32, u32> {
        self.0.regs.borrow().clone()
    }

    pub fn reads_of(&self, addr: u32) -> usize {
        self.0.reads.borrow().get(&addr).copied().unwrap_or(0)
    }

    pub fn read_count(&self) -> usize {
        self.0.reads.borrow().values().sum()
    }

    pub fn write_count(&self) -> usize {
        self.0.writes.borrow().len()
    }

    /// Values written to `addr`, oldest first
    pub fn writes_to(&self, addr: u32) -> Vec<u32> {
        self.0
            .writes
            .borrow()
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn reset_counters(&self) {
        self.0.reads.borrow_mut().clear();
        self.0.writes.borrow_mut().clear();
    }

    fn count_read(&self, addr: u32) {
        *self.0.reads.borrow_mut().entry(addr).or_insert(0) += 1;
    }
}

impl RegisterBus for FakeBus {
    fn read32(&self, addr: u32) -> u32 {
        self.count_read(addr);
        self.peek(addr)
    }

    fn write32(&self, addr: u32, val: u32) {
        self.0.writes.borrow_mut().push((addr, val));
        self.poke(addr, val);
    }

    fn read16(&self, addr: u32) -> u16 {
        self.count_read(addr);
        self.peek(addr) as u16
    }

    fn write16(&self, addr: u32, val: u16) {
        self.0.writes.borrow_mut().push((addr, val as u32));
        self.poke(addr, val as u32);
    }
}

/// Interrupt controller and delay that record what the driver asked for
#[derive(Clone, Default)]
pub struct FakeKernel(Rc<KernelInner>);

#[derive(Default)]
pub struct KernelInner {
    enabled: RefCell<Vec<Irq>>,
    disabled: RefCell<Vec<Irq>>,
    delayed_us: Cell<u64>,
    refuse_enable: Cell<bool>,
}

impl FakeKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A kernel whose interrupt controller rejects every unmask request
    pub fn refusing() -> Self {
        let kernel = Self::default();
        kernel.0.refuse_enable.set(true);
        kernel
    }

    pub fn enabled(&self) -> Vec<Irq> {
        self.0.enabled.borrow().clone()
    }

    pub fn disabled(&self) -> Vec<Irq> {
        self.0.disabled.borrow().clone()
    }

    pub fn delayed_us(&self) -> u64 {
        self.0.delayed_us.get()
    }
}

impl Kernel for FakeKernel {
    type Error = &'static str;

    fn enable_interrupt(&self, irq: Irq) -> Result<(), Self::Error> {
        if self.0.refuse_enable.get() {
            return Err("no handler installed");
        }
        self.0.enabled.borrow_mut().push(irq);
        Ok(())
    }

    fn disable_interrupt(&self, irq: Irq) {
        self.0.disabled.borrow_mut().push(irq);
    }

    fn delay_us(&self, us: u32) {
        self.0.delayed_us.set(self.0.delayed_us.get() + us as u64);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    ReceiveReady(usize),
    SendReady(usize),
}

/// Upper layer that only records the notifications it gets
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Notification>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        self.0.borrow_mut().drain(..).collect()
    }
}

impl SioHandler for Recorder {
    fn receive_ready(&self, exinf: usize) {
        self.0.borrow_mut().push(Notification::ReceiveReady(exinf));
    }

    fn send_ready(&self, exinf: usize) {
        self.0.borrow_mut().push(Notification::SendReady(exinf));
    }
}

/// 8 MHz on every bus
pub fn clocks_8mhz() -> Clocks {
    Clocks::undivided(8.MHz())
}
