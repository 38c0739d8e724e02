//! General Purpose Input / Output
//!
//! Serial pins are described by a [`PinConfig`] in the port descriptor tables rather than by
//! type-state pin objects, since the tables are compiled in and walked at run time.
use crate::mmio::RegisterBus;
use crate::stm32::gpio;

/// GPIO pin mode
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    Input = 0,
    Output = 1,
    Alternate = 2,
    Analog = 3,
}

/// GPIO Pin speed selection
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Speed {
    /// Low speed
    Low = 0,
    /// Medium speed
    Medium = 1,
    /// High speed
    High = 2,
    /// Very high speed
    VeryHigh = 3,
}

/// Output driver type
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OutputType {
    PushPull = 0,
    OpenDrain = 1,
}

/// Pull-up / pull-down selection
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Pull {
    Floating = 0,
    Up = 1,
    Down = 2,
}

/// Static configuration of one pin
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PinConfig {
    /// Base address of the GPIO block
    pub port: u32,
    /// Pin index within the block (0..=15)
    pub pin: u8,
    pub mode: Mode,
    pub speed: Speed,
    pub otype: OutputType,
    pub pull: Pull,
}

impl PinConfig {
    /// Push-pull alternate function pin with pull-up, the usual U(S)ART TX/RX setup
    pub const fn alternate(port: u32, pin: u8, speed: Speed) -> Self {
        assert!(pin < 16);
        PinConfig {
            port,
            pin,
            mode: Mode::Alternate,
            speed,
            otype: OutputType::PushPull,
            pull: Pull::Up,
        }
    }

    /// Mask of this pin's 2-bit field in MODER, OSPEEDR and PUPDR
    pub const fn field2_mask(&self) -> u32 {
        0b11 << (self.pin as u32 * 2)
    }

    /// Mask of this pin's bit in OTYPER
    pub const fn field1_mask(&self) -> u32 {
        1 << self.pin as u32
    }

    pub const fn mode_bits(&self) -> u32 {
        (self.mode as u32) << (self.pin as u32 * 2)
    }

    pub const fn speed_bits(&self) -> u32 {
        (self.speed as u32) << (self.pin as u32 * 2)
    }

    pub const fn otype_bits(&self) -> u32 {
        (self.otype as u32) << self.pin as u32
    }

    pub const fn pull_bits(&self) -> u32 {
        (self.pull as u32) << (self.pin as u32 * 2)
    }

    /// Programs mode, speed, output type and pull of the pin
    pub fn configure<B: RegisterBus>(&self, bus: &B) {
        let mask2 = self.field2_mask();
        bus.modify32(self.port + gpio::MODER, mask2, self.mode_bits());
        bus.modify32(self.port + gpio::OSPEEDR, mask2, self.speed_bits());
        bus.modify32(self.port + gpio::OTYPER, self.field1_mask(), self.otype_bits());
        bus.modify32(self.port + gpio::PUPDR, mask2, self.pull_bits());
    }

    /// Routes the pin to alternate function `af`
    pub fn set_alternate_function<B: RegisterBus>(&self, bus: &B, af: u8) {
        let (reg, offset) = if self.pin < 8 {
            (gpio::AFRL, self.pin as u32 * 4)
        } else {
            (gpio::AFRH, (self.pin as u32 - 8) * 4)
        };
        bus.modify32(self.port + reg, 0xF << offset, ((af & 0xF) as u32) << offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_and_values_are_pin_positioned() {
        let pa10 = PinConfig::alternate(0x4800_0000, 10, Speed::High);
        assert_eq!(pa10.field2_mask(), 0x0030_0000);
        assert_eq!(pa10.mode_bits(), 0x0020_0000);
        assert_eq!(pa10.speed_bits(), 0x0020_0000);
        assert_eq!(pa10.field1_mask(), 0x0400);
        assert_eq!(pa10.otype_bits(), 0);
        assert_eq!(pa10.pull_bits(), 0x0010_0000);
    }
}
