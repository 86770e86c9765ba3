//! Motorola MC6883 Synchronous Address Multiplexer (SAM).
//!
//! The SAM sits between the 6809, the dynamic RAM, the ROMs and the I/O
//! chips of the Color Computer and Dragon. It multiplexes row/column
//! addresses for RAM, drives the three S lines that select ROM and I/O,
//! divides the crystal down to the CPU clock, and generates the display
//! address stream the VDG reads from.
//!
//! All of its behaviour hangs off 16 bits of state, changed by writes into
//! $FFC0-$FFDF (see [`register`]). The chip owns:
//!
//! - the control register and the ENDC line,
//! - the active memory view (see [`view`]),
//! - the video address counter (see [`video`]).
//!
//! What each slot contains belongs to the host: the chip reports where each
//! slot is visible through [`SamHost`] and resolves individual addresses
//! with [`Sam6883::decode`].
//!
//! # Standalone IC
//!
//! RAM is never touched directly. The video path takes a reader closure,
//! the same way a VDG is handed its VRAM.

pub mod clock;
mod error;
pub mod host;
pub mod register;
mod snapshot;
pub mod video;
pub mod view;

use emu_core::{MasterClock, Observable, Value};
use log::{debug, trace};

pub use clock::{GIME_DIVIDER, MC6883_DIVIDER};
pub use error::SamError;
pub use host::{SamHost, Slot, SlotWindow};
pub use register::{ControlRegister, MemorySize, VideoMode};
pub use snapshot::SamSnapshot;
pub use video::{Carries, DISPLAY_RESTART, VideoCounter};
pub use view::{Decode, RamBank, RamCapacity, UNMAPPED_READ, ViewSelection};

use register::{F, M, P1, R, TY, V};

/// Construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamConfig {
    /// Crystal feeding the SAM's oscillator input.
    pub clock: MasterClock,
    /// Installed RAM in bytes.
    pub ram_size: usize,
    /// Base divider of this chip variant.
    pub divider: u32,
}

impl SamConfig {
    /// A stock MC6883.
    #[must_use]
    pub const fn mc6883(clock_hz: u64, ram_size: usize) -> Self {
        Self {
            clock: MasterClock::new(clock_hz),
            ram_size,
            divider: MC6883_DIVIDER,
        }
    }
}

/// Motorola MC6883 SAM bound to host `H`.
pub struct Sam6883<H: SamHost = ()> {
    host: H,
    clock: MasterClock,
    divider: u32,
    capacity: RamCapacity,

    register: ControlRegister,
    endc: bool,
    video: VideoCounter,

    view: ViewSelection,
    cpu_clock: u64,
}

impl<H: SamHost> Sam6883<H> {
    /// Attach a SAM to `host`.
    ///
    /// Fails if the RAM size is not one the SAM can be configured for. On
    /// success every slot has been installed and the CPU clock pushed to the
    /// host.
    pub fn new(config: SamConfig, host: H) -> Result<Self, SamError> {
        let capacity = RamCapacity::try_from(config.ram_size)?;
        let mut sam = Self {
            host,
            clock: config.clock,
            divider: config.divider,
            capacity,
            register: ControlRegister::default(),
            endc: false,
            video: VideoCounter::default(),
            view: ViewSelection::DISABLED,
            cpu_clock: 0,
        };
        sam.update_state();
        Ok(sam)
    }

    /// Chip reset: state, counter and ENDC cleared.
    pub fn reset(&mut self) {
        self.register = ControlRegister::default();
        self.endc = false;
        self.video = VideoCounter::default();
        self.update_state();
    }

    /// CPU write to control offset `offset` ($FFC0 + offset). Data is
    /// ignored; only the address matters.
    pub fn write(&mut self, offset: u16, _data: u8) {
        let change = self.register.alter(offset);
        let reg = self.register;

        if TY.touched_by(change) || M.touched_by(change) || P1.touched_by(change) {
            self.update_memory();
        }
        if R.touched_by(change) {
            self.update_cpu_clock();
        }

        if F.touched_by(change) {
            debug!(target: "motorola_6883::fbits", "SAM F address: ${:04X}", reg.display_offset());
        }
        if V.touched_by(change) {
            debug!(target: "motorola_6883::vbits", "SAM V bits: ${:02X}", reg.get(V));
        }
        if P1.touched_by(change) {
            debug!(target: "motorola_6883::pbits", "SAM P1 bit: ${:02X}", reg.get(P1));
        }
        if TY.touched_by(change) {
            debug!(target: "motorola_6883::tbits", "SAM TY bit: ${:02X}", reg.get(TY));
        }
        if M.touched_by(change) {
            debug!(target: "motorola_6883::mbits", "SAM M bits: ${:02X}", reg.get(M));
        }
        if R.touched_by(change) {
            debug!(target: "motorola_6883::rbits", "SAM R bits: ${:02X}", reg.get(R));
        }
    }

    /// CPU read of the control range. The SAM does not drive the bus.
    #[must_use]
    pub fn read(&self, _offset: u16) -> u8 {
        UNMAPPED_READ
    }

    /// VDG display fetch.
    ///
    /// `offset` is the VDG's address output; only DA0 is used, except for
    /// [`DISPLAY_RESTART`], which reloads the counter from the display
    /// offset. The counter is resolved through the selected RAM bank, so
    /// page one applies and ENDC reads as unmapped. `read_ram` reads a byte
    /// of RAM by offset and is only called for offsets inside the installed
    /// RAM.
    pub fn display_read(&mut self, offset: u32, read_ram: impl FnOnce(usize) -> u8) -> u8 {
        if offset == DISPLAY_RESTART {
            self.video.restart(self.register.display_offset());
        } else {
            self.video
                .clock_da0(offset & 1 != 0, self.register.video_mode());
        }
        self.view
            .video_fetch(self.video.counter, self.capacity)
            .map_or(UNMAPPED_READ, read_ram)
    }

    /// Horizontal sync input. Acts on assertion; the release is ignored.
    pub fn hs_w(&mut self, state: bool) -> Carries {
        if state {
            self.video.horizontal_sync(self.register.video_mode())
        } else {
            Carries::default()
        }
    }

    /// ENDC input: inhibits S decoding while asserted.
    pub fn endc_w(&mut self, state: bool) {
        self.endc = state;
        self.update_memory();
    }

    /// Resolve a CPU address against the current view.
    #[must_use]
    pub fn decode(&self, address: u16) -> Decode {
        let decoded = self.view.decode(address, self.capacity);
        if self.endc && decoded == Decode::Unmapped {
            trace!(target: "motorola_6883::endc", "ENDC access: ${address:04X}");
        }
        decoded
    }

    #[must_use]
    pub fn snapshot(&self) -> SamSnapshot {
        SamSnapshot {
            state: self.register.bits(),
            endc: self.endc,
            counter: self.video.counter,
            xdiv: self.video.xdiv,
            ydiv: self.video.ydiv,
        }
    }

    /// Load saved state and re-derive the memory view and clock. Nothing
    /// changes if the snapshot is rejected.
    pub fn restore(&mut self, snapshot: &SamSnapshot) -> Result<(), SamError> {
        let video = snapshot.video()?;
        self.register = ControlRegister::new(snapshot.state);
        self.endc = snapshot.endc;
        self.video = video;
        self.update_state();
        Ok(())
    }

    #[must_use]
    pub fn register(&self) -> ControlRegister {
        self.register
    }

    #[must_use]
    pub fn view(&self) -> ViewSelection {
        self.view
    }

    #[must_use]
    pub fn endc(&self) -> bool {
        self.endc
    }

    #[must_use]
    pub fn video_counter(&self) -> VideoCounter {
        self.video
    }

    #[must_use]
    pub fn display_offset(&self) -> u16 {
        self.register.display_offset()
    }

    /// Current MPU clock in Hz.
    #[must_use]
    pub fn cpu_clock(&self) -> u64 {
        self.cpu_clock
    }

    #[must_use]
    pub fn capacity(&self) -> RamCapacity {
        self.capacity
    }

    /// True if the installed RAM does not match the selected memory size.
    #[must_use]
    pub fn is_misconfigured(&self) -> bool {
        !self
            .capacity
            .is_properly_configured(self.register.memory_size().index())
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the host back, consuming the chip.
    pub fn into_host(self) -> H {
        self.host
    }

    fn update_state(&mut self) {
        self.update_memory();
        self.update_cpu_clock();
    }

    fn update_memory(&mut self) {
        self.view = ViewSelection::recompute(self.register, self.endc);

        if self.view.ram.is_some() && self.is_misconfigured() {
            debug!(
                target: "motorola_6883::mbits",
                "SAM memory size {:?} does not match {} bytes of RAM",
                self.register.memory_size(),
                self.capacity.bytes()
            );
        }

        let ram = self.view.ram.map(|bank| bank.windows(self.capacity));
        let view = self.view;
        host::install(&mut self.host, ram.as_deref(), |slot| view.slot_window(slot));
    }

    fn update_cpu_clock(&mut self) {
        self.cpu_clock = clock::effective_clock(self.clock, self.divider, self.register);
        self.host.set_cpu_clock(self.cpu_clock);
    }
}

impl<H: SamHost> Observable for Sam6883<H> {
    fn query(&self, path: &str) -> Option<Value> {
        let reg = self.register;
        let value = match path {
            "state" => reg.bits().into(),
            "ty" => reg.all_ram().into(),
            "m" => (reg.get(M) as u8).into(),
            "r" => (reg.get(R) as u8).into(),
            "p1" => reg.page_one().into(),
            "f" => (reg.get(F) as u8).into(),
            "v" => (reg.get(V) as u8).into(),
            "display_offset" => reg.display_offset().into(),
            "counter" => self.video.counter.into(),
            "xdiv" => self.video.xdiv.into(),
            "ydiv" => self.video.ydiv.into(),
            "endc" => self.endc.into(),
            "cpu_clock" => self.cpu_clock.into(),
            "ram_size" => (self.capacity.bytes() as u32).into(),
            "misconfigured" => self.is_misconfigured().into(),
            "view" => match self.view.ram {
                Some(bank) => bank.to_string().into(),
                None => "disabled".into(),
            },
            _ => return None,
        };
        Some(value)
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "state",
            "ty",
            "m",
            "r",
            "p1",
            "f",
            "v",
            "display_offset",
            "counter",
            "xdiv",
            "ydiv",
            "endc",
            "cpu_clock",
            "ram_size",
            "misconfigured",
            "view",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NTSC: u64 = 14_318_180;

    fn sam(ram_size: usize) -> Sam6883 {
        Sam6883::new(SamConfig::mc6883(NTSC, ram_size), ()).unwrap()
    }

    #[test]
    fn attach_rejects_unsupported_ram() {
        let err = Sam6883::new(SamConfig::mc6883(NTSC, 12000), ()).err();
        assert_eq!(err, Some(SamError::UnsupportedRamSize(12000)));
    }

    #[test]
    fn power_on_state() {
        let s = sam(65536);
        assert_eq!(s.register().bits(), 0);
        assert_eq!(s.view().ram, Some(RamBank::Ram4K));
        assert!(s.view().rom);
        assert!(s.view().io);
        assert_eq!(s.cpu_clock(), NTSC / 16);
        assert!(s.is_misconfigured());
    }

    #[test]
    fn speed_up_poke() {
        let mut s = sam(65536);
        s.write(0x17, 0); // $FFD7: set R0
        assert_eq!(s.cpu_clock(), NTSC / 8);
        s.write(0x16, 0); // $FFD6: clear R0
        assert_eq!(s.cpu_clock(), NTSC / 16);
    }

    #[test]
    fn control_read_has_no_side_effects() {
        let mut s = sam(16384);
        s.write(0x1B, 0);
        let before = s.snapshot();
        for offset in 0..32 {
            assert_eq!(s.read(offset), UNMAPPED_READ);
        }
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn endc_round_trip() {
        let mut s = sam(65536);
        s.write(0x1D, 0); // M1
        s.write(0x1F, 0); // TY
        let before = s.view();
        s.endc_w(true);
        assert_eq!(s.view(), ViewSelection::DISABLED);
        assert_eq!(s.decode(0x1234), Decode::Unmapped);
        s.endc_w(false);
        assert_eq!(s.view(), before);
        assert_eq!(s.decode(0x1234), Decode::Ram(0x1234));
    }

    #[test]
    fn display_restart_loads_display_offset() {
        let mut s = sam(16384);
        s.write(0x1B, 0); // 16K
        s.write(0x09, 0); // F1 -> $0400
        let byte = s.display_read(DISPLAY_RESTART, |offset| {
            assert_eq!(offset, 0x0400);
            0x5A
        });
        assert_eq!(byte, 0x5A);
        assert_eq!(s.video_counter().counter, 0x0400);
        let byte = s.display_read(1, |offset| offset as u8);
        assert_eq!(byte, 0x01);
    }

    #[test]
    fn display_read_beyond_ram_is_unmapped() {
        let mut s = sam(4096);
        s.write(0x0D, 0); // F3 -> $1000
        let byte = s.display_read(DISPLAY_RESTART, |_| panic!("read past 4K"));
        assert_eq!(byte, UNMAPPED_READ);
    }

    #[test]
    fn display_read_follows_page_one() {
        let mut s = sam(65536);
        s.write(0x1D, 0); // M1
        s.write(0x15, 0); // P1
        assert_eq!(s.view().ram, Some(RamBank::Paged64K));
        let mut fetched = None;
        s.display_read(DISPLAY_RESTART, |offset| {
            fetched = Some(offset);
            0
        });
        assert_eq!(fetched, Some(0x8000));
    }

    #[test]
    fn display_read_under_endc_is_unmapped() {
        let mut s = sam(65536);
        s.write(0x1D, 0);
        s.endc_w(true);
        let byte = s.display_read(DISPLAY_RESTART, |_| panic!("RAM read under ENDC"));
        assert_eq!(byte, UNMAPPED_READ);
        s.endc_w(false);
        assert_eq!(s.display_read(DISPLAY_RESTART, |_| 0xAA), 0xAA);
    }

    #[test]
    fn hsync_release_is_ignored() {
        let mut s = sam(4096);
        s.display_read(DISPLAY_RESTART, |_| 0);
        for n in 0..3u32 {
            s.display_read(n % 2 + 1, |_| 0);
        }
        let before = s.video_counter();
        assert_eq!(s.hs_w(false), Carries::default());
        assert_eq!(s.video_counter(), before);
        s.hs_w(true);
        assert_eq!(s.video_counter().counter & 0x1F, 0);
    }

    #[test]
    fn restore_reapplies_view_and_clock() {
        let mut s = sam(65536);
        let snap = SamSnapshot {
            state: 0xCC00, // TY, M1, R0, P1
            endc: false,
            counter: 0x0E00,
            xdiv: 0,
            ydiv: 3,
        };
        s.restore(&snap).unwrap();
        assert_eq!(s.view().ram, Some(RamBank::Paged64K));
        assert!(!s.view().rom);
        assert_eq!(s.cpu_clock(), NTSC / 8);
        assert_eq!(s.snapshot(), snap);
    }

    #[test]
    fn rejected_restore_leaves_state() {
        let mut s = sam(65536);
        s.write(0x1D, 0);
        let before = s.snapshot();
        let bad = SamSnapshot { xdiv: 200, ..before };
        assert!(s.restore(&bad).is_err());
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = sam(65536);
        s.write(0x1F, 0);
        s.write(0x17, 0);
        s.endc_w(true);
        s.display_read(DISPLAY_RESTART, |_| 0);
        s.reset();
        assert_eq!(s.snapshot(), SamSnapshot::default());
        assert_eq!(s.view().ram, Some(RamBank::Ram4K));
        assert_eq!(s.cpu_clock(), NTSC / 16);
    }

    #[test]
    fn observable_paths() {
        let mut s = sam(32768);
        s.write(0x1B, 0); // M0: 16K mode
        assert_eq!(s.query("m"), Some(Value::U8(1)));
        assert_eq!(s.query("view"), Some(Value::String("Ram16K".into())));
        assert_eq!(s.query("misconfigured"), Some(Value::Bool(false)));
        assert_eq!(s.query("ram_size"), Some(Value::U32(32768)));
        assert_eq!(s.query("bogus"), None);
        for path in s.query_paths() {
            assert!(s.query(path).is_some(), "{path}");
        }
    }
}
