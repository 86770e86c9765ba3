//! MPU rate control.
//!
//! The infamous speed-up poke. R1:R0 occupy control offsets 22-25:
//!
//! | R1:R0 | Rate                                          |
//! |-------|-----------------------------------------------|
//! | 00    | slow, 0.89 MHz                                |
//! | 01    | address dependent: RAM 0.89 MHz, ROM 1.78 MHz |
//! | 1x    | fast, 1.78 MHz                                |
//!
//! Only R0 reaches the CPU clock here. R1 speeds up video addressing, which
//! the VDG on CoCo 1/2 cannot keep up with. Dual speed (ROM fast, RAM slow)
//! is not modelled: the whole address space runs at the R0 rate.

use emu_core::MasterClock;

use crate::register::{ControlRegister, R0};

/// Base clock divider of the discrete MC6883 part.
pub const MC6883_DIVIDER: u32 = 4;
/// Base clock divider of the GIME, which reuses this register design.
pub const GIME_DIVIDER: u32 = 8;

/// Effective MPU clock in Hz.
#[must_use]
pub fn effective_clock(base: MasterClock, divider: u32, register: ControlRegister) -> u64 {
    let rate_divider = if register.flag(R0) { 2 } else { 4 };
    base.divided(u64::from(divider) * rate_divider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::R1;

    const NTSC: MasterClock = MasterClock::new(14_318_180);

    #[test]
    fn slow_and_fast_rates() {
        let mut reg = ControlRegister::default();
        assert_eq!(effective_clock(NTSC, 4, reg), 14_318_180 / 16);
        reg.set(R0, 1);
        assert_eq!(effective_clock(NTSC, 4, reg), 14_318_180 / 8);
    }

    #[test]
    fn r1_alone_does_not_change_cpu_rate() {
        let mut reg = ControlRegister::default();
        reg.set(R1, 1);
        assert_eq!(effective_clock(NTSC, 4, reg), 14_318_180 / 16);
    }

    #[test]
    fn gime_divider_halves_rates() {
        let mut reg = ControlRegister::default();
        reg.set(R0, 1);
        assert_eq!(
            effective_clock(NTSC, GIME_DIVIDER, reg),
            effective_clock(NTSC, MC6883_DIVIDER, reg) / 2
        );
    }
}
