//! CPU-visible memory bus.

/// The CPU side of a memory bus.
///
/// A machine implements this over whatever sits behind its address decoder.
/// Reads may have side effects (I/O registers); use [`Bus::peek`] for
/// inspection.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);

    /// Read a byte without side effects.
    ///
    /// Defaults to 0 for buses that cannot service a side-effect-free read.
    fn peek(&self, address: u16) -> u8 {
        let _ = address;
        0
    }
}
