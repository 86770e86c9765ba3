//! Video address counter.
//!
//! The counter is a chain of flip-flops clocked by DA0 from the VDG. Bits
//! B0-B3 count every DA0 toggle; the carry out of B3 goes through a
//! mode-dependent X divider into B4, and the carry out of B4 through a Y
//! divider into B5-B15. Horizontal sync clears the low bits, and because the
//! counter is a ripple chain, clearing a set top bit produces a carry just as
//! an increment would. Guardian depends on that (semigraphics modes).

use crate::register::{SyncClear, VideoMode};

/// Sentinel offset the VDG uses to restart the counter at the display
/// offset.
pub const DISPLAY_RESTART: u32 = u32::MAX;

/// Carries produced by one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carries {
    /// Carry out of B3 (into the X divider).
    pub bit3: bool,
    /// Carry out of B4 (into the Y divider).
    pub bit4: bool,
    /// The Y divider wrapped and the counter advanced by $20.
    pub row: bool,
}

/// Counter and its two sub-dividers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoCounter {
    pub counter: u16,
    pub xdiv: u8,
    pub ydiv: u8,
}

impl VideoCounter {
    /// Restart at `display_offset` with both dividers cleared.
    pub fn restart(&mut self, display_offset: u16) {
        self.counter = display_offset;
        self.xdiv = 0;
        self.ydiv = 0;
    }

    /// DA0 from the VDG. Bumps B0-B3 if DA0 differs from B0.
    pub fn clock_da0(&mut self, da0: bool, mode: VideoMode) -> Carries {
        let mut carries = Carries::default();
        if da0 == (self.counter & 0x0001 != 0) {
            return carries;
        }
        let wrap = self.counter & 0x000F == 0x000F;
        self.counter = (self.counter & !0x000F) | (self.counter.wrapping_add(1) & 0x000F);
        if wrap {
            carries.bit3 = true;
            self.carry_bit3(mode, &mut carries);
        }
        carries
    }

    /// Rising edge of horizontal sync.
    pub fn horizontal_sync(&mut self, mode: VideoMode) -> Carries {
        let mut carries = Carries::default();
        match mode.sync_clear() {
            SyncClear::Low4 => {
                let carry = self.counter & 0x0008 != 0;
                self.counter &= !0x000F;
                if carry {
                    carries.bit3 = true;
                    self.carry_bit3(mode, &mut carries);
                }
            }
            SyncClear::Low5 => {
                let carry = self.counter & 0x0010 != 0;
                self.counter &= !0x001F;
                if carry {
                    carries.bit4 = true;
                    self.carry_bit4(mode, &mut carries);
                }
            }
            SyncClear::None => {}
        }
        carries
    }

    fn carry_bit3(&mut self, mode: VideoMode, carries: &mut Carries) {
        self.xdiv += 1;
        if self.xdiv >= mode.x_division() {
            self.xdiv = 0;
            self.counter ^= 0x0010;
            if self.counter & 0x0010 == 0 {
                carries.bit4 = true;
                self.carry_bit4(mode, carries);
            }
        }
    }

    fn carry_bit4(&mut self, mode: VideoMode, carries: &mut Carries) {
        self.ydiv += 1;
        if self.ydiv >= mode.y_division() {
            self.ydiv = 0;
            self.counter = self.counter.wrapping_add(0x0020);
            carries.row = true;
        }
    }
}
