//! A simulated sensor bench for tests: a fake microsecond clock shared by the trigger pin,
//! the echo pin and the delay, plus a script of echo lengths to answer pings with.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

use crate::{Now, RangeSampler};

/// Time between the falling trigger edge and the rising echo edge.
pub const ECHO_LATENCY_US: u64 = 450;

#[derive(Default)]
pub struct Bench {
    now: u64,
    script: VecDeque<Option<u32>>,
    trigger_high_since: Option<u64>,
    echo_window: Option<(u64, u64)>,
    stale_high_until: u64,
    pub trigger_widths: Vec<u64>,
}

impl Bench {
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn set_now(&mut self, now: u64) {
        self.now = now;
    }

    /// Queue echo lengths for the next pings. `None` means the ping is never answered.
    pub fn script(&mut self, echoes: &[Option<u32>]) {
        self.script.extend(echoes.iter().copied());
    }

    /// Hold the echo line high until `until`, as if an earlier pulse were still in flight.
    pub fn stale_pulse(&mut self, until: u64) {
        self.stale_high_until = until;
    }

    fn echo_high(&self) -> bool {
        let answering = self
            .echo_window
            .is_some_and(|(rise, fall)| self.now >= rise && self.now < fall);
        answering || self.now < self.stale_high_until
    }

    fn fire(&mut self) {
        self.echo_window = match self.script.pop_front().flatten() {
            Some(length) => {
                let rise = self.now + ECHO_LATENCY_US;
                Some((rise, rise + u64::from(length)))
            }
            None => None,
        };
    }
}

pub type Shared = Rc<RefCell<Bench>>;

pub struct SimTrigger(pub Shared);
pub struct SimEcho(pub Shared);
pub struct SimClock(pub Shared);
pub struct SimDelay(pub Shared);

impl ErrorType for SimTrigger {
    type Error = Infallible;
}

impl OutputPin for SimTrigger {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut bench = self.0.borrow_mut();
        bench.trigger_high_since = Some(bench.now);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut bench = self.0.borrow_mut();
        if let Some(since) = bench.trigger_high_since.take() {
            let width = bench.now - since;
            bench.trigger_widths.push(width);
            bench.fire();
        }
        Ok(())
    }
}

impl ErrorType for SimEcho {
    type Error = Infallible;
}

impl InputPin for SimEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow().echo_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow().echo_high())
    }
}

impl Now for SimClock {
    // Every read costs a microsecond, so polling loops always make progress.
    fn now_micros(&self) -> u64 {
        let mut bench = self.0.borrow_mut();
        let now = bench.now;
        bench.now += 1;
        now
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now += u64::from(ns).div_ceil(1000);
    }
}

/// An echo pin whose every read fails.
pub struct FaultyEcho;

impl ErrorType for FaultyEcho {
    type Error = ErrorKind;
}

impl InputPin for FaultyEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }
}

pub type SimSampler = RangeSampler<SimTrigger, SimEcho, (), SimClock, SimDelay>;

/// A sampler wired to a fresh bench that answers pings with `echoes`, in order.
pub fn sampler(echoes: &[Option<u32>]) -> (Shared, SimSampler) {
    let bench: Shared = Rc::new(RefCell::new(Bench::default()));
    bench.borrow_mut().script(echoes);
    let sampler = RangeSampler::new(
        SimTrigger(bench.clone()),
        SimEcho(bench.clone()),
        (),
        SimClock(bench.clone()),
        SimDelay(bench.clone()),
    )
    .unwrap();
    (bench, sampler)
}
