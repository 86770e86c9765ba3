//! Host binding: the machine-specific side of the eight select lines.
//!
//! The SAM drives three S (select) lines into a 74LS138; each of the eight
//! outputs enables one region on the host board. The chip decides which
//! regions are addressable and where; the host decides what they contain.

use std::ops::RangeInclusive;

/// One of the eight regions decoded from the S lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// S0: RAM.
    Ram,
    /// S1: ROM at $8000-$9FFF.
    Rom0,
    /// S2: ROM at $A000-$BFFF (also backs the vector mirror).
    Rom1,
    /// S3: ROM at $C000-$FEFF (cartridge).
    Rom2,
    /// S4: I/O at $FF00-$FF1F.
    Io0,
    /// S5: I/O at $FF20-$FF3F.
    Io1,
    /// S6: I/O at $FF40-$FF5F.
    Io2,
    /// S7: reserved, $FF60-$FFBF.
    Reserved,
}

impl Slot {
    pub const ALL: [Slot; 8] = [
        Slot::Ram,
        Slot::Rom0,
        Slot::Rom1,
        Slot::Rom2,
        Slot::Io0,
        Slot::Io1,
        Slot::Io2,
        Slot::Reserved,
    ];

    /// CPU address range of a fixed-window slot. RAM has no fixed window.
    #[must_use]
    pub const fn fixed_window(self) -> Option<RangeInclusive<u16>> {
        match self {
            Slot::Ram => None,
            Slot::Rom0 => Some(0x8000..=0x9FFF),
            Slot::Rom1 => Some(0xA000..=0xBFFF),
            Slot::Rom2 => Some(0xC000..=0xFEFF),
            Slot::Io0 => Some(0xFF00..=0xFF1F),
            Slot::Io1 => Some(0xFF20..=0xFF3F),
            Slot::Io2 => Some(0xFF40..=0xFF5F),
            Slot::Reserved => Some(0xFF60..=0xFFBF),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Slot::Ram => "s0_ram",
            Slot::Rom0 => "s1_rom0",
            Slot::Rom1 => "s2_rom1",
            Slot::Rom2 => "s3_rom2",
            Slot::Io0 => "s4_io0",
            Slot::Io1 => "s5_io1",
            Slot::Io2 => "s6_io2",
            Slot::Reserved => "s7_res",
        }
    }
}

/// Where a slot is currently visible to the CPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotWindow {
    /// CPU addresses that select the slot.
    pub range: RangeInclusive<u16>,
    /// Offset into the slot's backing store for `range.start()`.
    pub base: usize,
}

impl SlotWindow {
    #[must_use]
    pub const fn new(range: RangeInclusive<u16>, base: usize) -> Self {
        Self { range, base }
    }

    /// Backing offset for a CPU address inside the window.
    #[must_use]
    pub fn offset_of(&self, address: u16) -> Option<usize> {
        self.range
            .contains(&address)
            .then(|| self.base + usize::from(address - *self.range.start()))
    }
}

/// Callbacks implemented by the machine hosting a SAM.
///
/// Each slot method is called whenever the chip recomputes its memory view,
/// with the window the slot now occupies or `None` if it is not
/// addressable. Calls may repeat with identical arguments and must be
/// idempotent. RAM may be given more than one window (the paged
/// configuration maps the upper half twice); each call replaces the
/// previous set, and `None` clears it.
#[allow(unused_variables)]
pub trait SamHost {
    fn s0_ram_map(&mut self, windows: Option<&[SlotWindow]>) {}
    fn s1_rom0_map(&mut self, window: Option<SlotWindow>) {}
    fn s2_rom1_map(&mut self, window: Option<SlotWindow>) {}
    fn s3_rom2_map(&mut self, window: Option<SlotWindow>) {}
    fn s4_io0_map(&mut self, window: Option<SlotWindow>) {}
    fn s5_io1_map(&mut self, window: Option<SlotWindow>) {}
    fn s6_io2_map(&mut self, window: Option<SlotWindow>) {}
    fn s7_res_map(&mut self, window: Option<SlotWindow>) {}

    /// The MPU clock changed to `hz`.
    fn set_cpu_clock(&mut self, hz: u64) {}
}

/// Host with nothing attached, for a bare chip.
impl SamHost for () {}

impl<H: SamHost + ?Sized> SamHost for &mut H {
    fn s0_ram_map(&mut self, windows: Option<&[SlotWindow]>) {
        (**self).s0_ram_map(windows);
    }
    fn s1_rom0_map(&mut self, window: Option<SlotWindow>) {
        (**self).s1_rom0_map(window);
    }
    fn s2_rom1_map(&mut self, window: Option<SlotWindow>) {
        (**self).s2_rom1_map(window);
    }
    fn s3_rom2_map(&mut self, window: Option<SlotWindow>) {
        (**self).s3_rom2_map(window);
    }
    fn s4_io0_map(&mut self, window: Option<SlotWindow>) {
        (**self).s4_io0_map(window);
    }
    fn s5_io1_map(&mut self, window: Option<SlotWindow>) {
        (**self).s5_io1_map(window);
    }
    fn s6_io2_map(&mut self, window: Option<SlotWindow>) {
        (**self).s6_io2_map(window);
    }
    fn s7_res_map(&mut self, window: Option<SlotWindow>) {
        (**self).s7_res_map(window);
    }
    fn set_cpu_clock(&mut self, hz: u64) {
        (**self).set_cpu_clock(hz);
    }
}

impl<H: SamHost + ?Sized> SamHost for Box<H> {
    fn s0_ram_map(&mut self, windows: Option<&[SlotWindow]>) {
        (**self).s0_ram_map(windows);
    }
    fn s1_rom0_map(&mut self, window: Option<SlotWindow>) {
        (**self).s1_rom0_map(window);
    }
    fn s2_rom1_map(&mut self, window: Option<SlotWindow>) {
        (**self).s2_rom1_map(window);
    }
    fn s3_rom2_map(&mut self, window: Option<SlotWindow>) {
        (**self).s3_rom2_map(window);
    }
    fn s4_io0_map(&mut self, window: Option<SlotWindow>) {
        (**self).s4_io0_map(window);
    }
    fn s5_io1_map(&mut self, window: Option<SlotWindow>) {
        (**self).s5_io1_map(window);
    }
    fn s6_io2_map(&mut self, window: Option<SlotWindow>) {
        (**self).s6_io2_map(window);
    }
    fn s7_res_map(&mut self, window: Option<SlotWindow>) {
        (**self).s7_res_map(window);
    }
    fn set_cpu_clock(&mut self, hz: u64) {
        (**self).set_cpu_clock(hz);
    }
}

/// Hand each slot its window from `windows` (or `None`).
pub(crate) fn install<H: SamHost + ?Sized>(
    host: &mut H,
    ram: Option<&[SlotWindow]>,
    window: impl Fn(Slot) -> Option<SlotWindow>,
) {
    host.s0_ram_map(ram);
    host.s1_rom0_map(window(Slot::Rom0));
    host.s2_rom1_map(window(Slot::Rom1));
    host.s3_rom2_map(window(Slot::Rom2));
    host.s4_io0_map(window(Slot::Io0));
    host.s5_io1_map(window(Slot::Io1));
    host.s6_io2_map(window(Slot::Io2));
    host.s7_res_map(window(Slot::Reserved));
}
