//! Core traits and types shared by the emulated chips.
//!
//! Chips are plain state machines. They are driven by whoever owns them
//! (a machine, a test harness) through these seams, and expose their
//! internal state for inspection without side effects.

mod bus;
mod clock;
mod observable;

pub use bus::Bus;
pub use clock::MasterClock;
pub use observable::{Observable, Value};
