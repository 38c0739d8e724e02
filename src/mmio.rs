//! Memory-mapped register access
//!
//! Every hardware access in this crate goes through a [`RegisterBus`]. On the target that is
//! [`Mmio`], which performs volatile loads and stores at the given addresses. Host tests plug in
//! their own bus to observe and script register traffic.

/// Primitive 32-bit and 16-bit register operations.
///
/// Only `read32`, `write32`, `read16` and `write16` are required. The read-modify-write helpers
/// are built on top of them and are not atomic: callers that share bits with an interrupt
/// handler must wrap them in a critical section.
pub trait RegisterBus {
    fn read32(&self, addr: u32) -> u32;

    fn write32(&self, addr: u32, val: u32);

    fn read16(&self, addr: u32) -> u16;

    fn write16(&self, addr: u32, val: u16);

    /// Sets the bits of `mask`.
    #[inline]
    fn or32(&self, addr: u32, mask: u32) {
        self.write32(addr, self.read32(addr) | mask);
    }

    /// Clears the bits of `mask`.
    ///
    /// This is an AND with the complement of `mask`, not with `mask` itself.
    #[inline]
    fn and32(&self, addr: u32, mask: u32) {
        self.write32(addr, self.read32(addr) & !mask);
    }

    /// Clears the bits of `mask`, then sets the bits of `value`.
    ///
    /// `value` must already be shifted into the bit positions of `mask`.
    #[inline]
    fn modify32(&self, addr: u32, mask: u32, value: u32) {
        self.write32(addr, (self.read32(addr) & !mask) | value);
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    fn read32(&self, addr: u32) -> u32 {
        (**self).read32(addr)
    }

    fn write32(&self, addr: u32, val: u32) {
        (**self).write32(addr, val)
    }

    fn read16(&self, addr: u32) -> u16 {
        (**self).read16(addr)
    }

    fn write16(&self, addr: u32, val: u16) {
        (**self).write16(addr, val)
    }
}

/// Volatile access to device memory.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Creates the hardware register bus.
    ///
    /// # Safety
    ///
    /// Every address handed to this bus, including all addresses in the port descriptor tables
    /// it is used with, must be a valid, suitably aligned device register on the running chip.
    pub const unsafe fn new() -> Self {
        Mmio { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read32(&self, addr: u32) -> u32 {
        // NOTE(unsafe) address validity is the contract of `Mmio::new`
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    #[inline(always)]
    fn write32(&self, addr: u32, val: u32) {
        // NOTE(unsafe) address validity is the contract of `Mmio::new`
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, val) }
    }

    #[inline(always)]
    fn read16(&self, addr: u32) -> u16 {
        // NOTE(unsafe) address validity is the contract of `Mmio::new`
        unsafe { core::ptr::read_volatile(addr as usize as *const u16) }
    }

    #[inline(always)]
    fn write16(&self, addr: u32, val: u16) {
        // NOTE(unsafe) address validity is the contract of `Mmio::new`
        unsafe { core::ptr::write_volatile(addr as usize as *mut u16, val) }
    }
}
