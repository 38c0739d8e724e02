mod common;

use common::{clocks_8mhz, FakeBus, FakeKernel, Recorder};
use stm32l4xx_sio::{PortId, Sio};

#[test]
#[should_panic(expected = "cannot unmask irq 38")]
fn open_panics_when_the_interrupt_cannot_be_enabled() {
    let mut sio = Sio::new(
        FakeBus::new(),
        FakeKernel::refusing(),
        Recorder::new(),
        clocks_8mhz(),
    );
    sio.open(PortId::Port1, 0);
}
