//! Recording serial sink and delay for tests. Both halves log into one shared event
//! list so tests can check how bytes and waits interleave.
extern crate std;

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_io::{ErrorKind, ErrorType, Write};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Event {
    /// One `write` call on the sink
    Write(Vec<u8>),
    /// A delay, in microseconds
    Delay(u64),
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    pub fn sink(&self) -> RecordingSink {
        RecordingSink {
            events: self.events.clone(),
        }
    }

    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay {
            events: self.events.clone(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Every byte written, in order
    pub fn bytes(&self) -> Vec<u8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Write(bytes) => Some(bytes.clone()),
                Event::Delay(_) => None,
            })
            .flatten()
            .collect()
    }

    pub fn delays_us(&self) -> Vec<u64> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Delay(us) => Some(*us),
                Event::Write(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(events: &Rc<RefCell<Vec<Event>>>, event: Event) {
        events.borrow_mut().push(event);
    }
}

#[derive(Debug)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<Event>>>,
}

impl RecordingSink {
    pub fn writes(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Write(_)))
            .count()
    }
}

impl ErrorType for RecordingSink {
    type Error = ErrorKind;
}

impl Write for RecordingSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Recorder::push(&self.events, Event::Write(Vec::from(buf)));
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct RecordingDelay {
    events: Rc<RefCell<Vec<Event>>>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        Recorder::push(&self.events, Event::Delay(u64::from(ns) / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        Recorder::push(&self.events, Event::Delay(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        Recorder::push(&self.events, Event::Delay(u64::from(ms) * 1_000));
    }
}

/// A transport whose every write fails
#[derive(Debug)]
pub struct FailingSink;

impl ErrorType for FailingSink {
    type Error = ErrorKind;
}

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A transport that accepts a fixed number of writes and fails every one after that
#[derive(Debug)]
pub struct LimitedSink {
    remaining: usize,
    written: usize,
}

impl LimitedSink {
    pub fn new(writes: usize) -> Self {
        LimitedSink {
            remaining: writes,
            written: 0,
        }
    }

    /// Number of writes that went through
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ErrorType for LimitedSink {
    type Error = ErrorKind;
}

impl Write for LimitedSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.remaining == 0 {
            return Err(ErrorKind::Other);
        }
        self.remaining -= 1;
        self.written += 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
