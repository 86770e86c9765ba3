//! Memory view selection and CPU address decoding.
//!
//! Layers, top wins:
//!
//! ```text
//! SAM control:                                     $FFC0-$FFDF
//! I/O view:                             $FF00-$FFBF
//! ROM view:               $8000-$FEFF
//! RAM view:  $0000-$FEFF (bank dependent)          + vector mirror $FFE0-$FFFF
//! ENDC:      everything except the control range reads as unmapped
//! ```
//!
//! The vector mirror belongs to the RAM view: it is present in every bank,
//! ignores TY, and always reads the top 32 bytes of ROM slot S2.

use std::fmt;

use crate::error::SamError;
use crate::host::{Slot, SlotWindow};
use crate::register::{ControlRegister, MemorySize};

/// Value read from an address nothing drives.
pub const UNMAPPED_READ: u8 = 0x00;

const RAM_TOP: u16 = 0xFEFF;
const ROM_BASE: u16 = 0x8000;
const IO_BASE: u16 = 0xFF00;
const IO_TOP: u16 = 0xFFBF;
const CONTROL_BASE: u16 = 0xFFC0;
const CONTROL_TOP: u16 = 0xFFDF;
const VECTOR_BASE: u16 = 0xFFE0;
/// S2 offset of the 32 bytes mirrored at $FFE0.
const VECTOR_ROM_OFFSET: usize = 0x1FE0;
const PAGE_SIZE: usize = 0x8000;

/// Installed RAM size. Only the sizes the SAM can be strapped for exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RamCapacity(usize);

impl RamCapacity {
    pub const SUPPORTED: [usize; 5] = [4096, 8192, 16384, 32768, 65536];

    #[must_use]
    pub const fn bytes(self) -> usize {
        self.0
    }

    /// True if this capacity matches what memory-size mode `m` (M1:M0)
    /// expects.
    #[must_use]
    pub const fn is_properly_configured(self, m: u8) -> bool {
        matches!(
            (m, self.0),
            (0, 4096 | 8192) | (1, 16384 | 32768) | (2, 32768 | 65536) | (3, 65536)
        )
    }
}

impl TryFrom<usize> for RamCapacity {
    type Error = SamError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        if Self::SUPPORTED.contains(&bytes) {
            Ok(Self(bytes))
        } else {
            Err(SamError::UnsupportedRamSize(bytes))
        }
    }
}

/// RAM bank configuration of the RAM view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamBank {
    Ram4K,
    Ram16K,
    Dynamic64K,
    Static64K,
    /// 64K with P1 set: both halves of the CPU map see RAM $8000-$FFFF.
    Paged64K,
}

impl RamBank {
    #[must_use]
    pub fn select(register: ControlRegister) -> Self {
        match register.memory_size() {
            MemorySize::Size4K => Self::Ram4K,
            MemorySize::Size16K => Self::Ram16K,
            // CoCo Max relies on dynamic and static decoding identically.
            MemorySize::Dynamic64K | MemorySize::Static64K if register.page_one() => {
                Self::Paged64K
            }
            MemorySize::Dynamic64K => Self::Dynamic64K,
            MemorySize::Static64K => Self::Static64K,
        }
    }

    /// RAM offset seen by the CPU at `address`, if any.
    #[must_use]
    pub fn translate(self, address: u16, capacity: RamCapacity) -> Option<usize> {
        if address > RAM_TOP {
            return None;
        }
        let offset = match self {
            Self::Paged64K => PAGE_SIZE | (usize::from(address) & (PAGE_SIZE - 1)),
            _ => usize::from(address),
        };
        (offset < capacity.bytes()).then_some(offset)
    }

    /// CPU windows through which RAM is visible. A capacity that does not
    /// match M1:M0 is still exposed in full, up to $FEFF.
    #[must_use]
    pub fn windows(self, capacity: RamCapacity) -> Vec<SlotWindow> {
        let exposed = capacity.bytes();
        let mut windows = Vec::with_capacity(2);
        match self {
            Self::Paged64K => {
                let upper = exposed.saturating_sub(PAGE_SIZE);
                if upper > 0 {
                    let low_end = upper.min(PAGE_SIZE) - 1;
                    windows.push(SlotWindow::new(0x0000..=low_end as u16, PAGE_SIZE));
                    let high_end = (PAGE_SIZE + upper - 1).min(usize::from(RAM_TOP));
                    windows.push(SlotWindow::new(ROM_BASE..=high_end as u16, PAGE_SIZE));
                }
            }
            _ => {
                if exposed > 0 {
                    let end = (exposed - 1).min(usize::from(RAM_TOP));
                    windows.push(SlotWindow::new(0x0000..=end as u16, 0));
                }
            }
        }
        windows
    }
}

impl fmt::Display for RamBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The active memory view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSelection {
    /// RAM bank view, `None` when ENDC suppresses it.
    pub ram: Option<RamBank>,
    /// ROM overlay at $8000-$FEFF.
    pub rom: bool,
    /// I/O overlay at $FF00-$FFBF.
    pub io: bool,
}

impl ViewSelection {
    /// Selection with every overlay suppressed.
    pub const DISABLED: Self = Self {
        ram: None,
        rom: false,
        io: false,
    };

    /// Select the view for `register`. Only TY, M1:M0 and P1 matter.
    #[must_use]
    pub fn recompute(register: ControlRegister, endc: bool) -> Self {
        if endc {
            return Self::DISABLED;
        }
        Self {
            ram: Some(RamBank::select(register)),
            rom: !register.all_ram(),
            io: true,
        }
    }

    /// Window currently occupied by a fixed-window slot.
    #[must_use]
    pub fn slot_window(&self, slot: Slot) -> Option<SlotWindow> {
        let enabled = match slot {
            Slot::Ram => return None,
            Slot::Rom0 | Slot::Rom1 | Slot::Rom2 => self.rom,
            Slot::Io0 | Slot::Io1 | Slot::Io2 | Slot::Reserved => self.io,
        };
        if enabled {
            slot.fixed_window().map(|range| SlotWindow::new(range, 0))
        } else {
            None
        }
    }

    /// Resolve a CPU address.
    #[must_use]
    pub fn decode(&self, address: u16, capacity: RamCapacity) -> Decode {
        if (CONTROL_BASE..=CONTROL_TOP).contains(&address) {
            return Decode::Control(address - CONTROL_BASE);
        }
        let Some(bank) = self.ram else {
            return Decode::Unmapped;
        };
        if address >= VECTOR_BASE {
            return Decode::Vector(VECTOR_ROM_OFFSET + usize::from(address - VECTOR_BASE));
        }
        if (IO_BASE..=IO_TOP).contains(&address) {
            return if self.io {
                fixed_slot(address, &[Slot::Io0, Slot::Io1, Slot::Io2, Slot::Reserved])
            } else {
                Decode::Unmapped
            };
        }
        if self.rom && address >= ROM_BASE {
            return fixed_slot(address, &[Slot::Rom0, Slot::Rom1, Slot::Rom2]);
        }
        bank.translate(address, capacity)
            .map_or(Decode::Unmapped, Decode::Ram)
    }

    /// RAM offset the video counter reads through the selected bank.
    /// `None` while ENDC suppresses RAM or past the end of the bank.
    #[must_use]
    pub fn video_fetch(&self, counter: u16, capacity: RamCapacity) -> Option<usize> {
        self.ram?.translate(counter, capacity)
    }
}

fn fixed_slot(address: u16, slots: &[Slot]) -> Decode {
    slots
        .iter()
        .find_map(|&slot| {
            let window = slot.fixed_window()?;
            window.contains(&address).then(|| Decode::Slot {
                slot,
                offset: usize::from(address - *window.start()),
            })
        })
        .unwrap_or(Decode::Unmapped)
}

/// What a CPU address selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    /// RAM byte offset.
    Ram(usize),
    /// ROM, I/O or reserved slot, offset from the start of its window.
    Slot { slot: Slot, offset: usize },
    /// Vector mirror: ROM slot S2 byte offset. Reads only.
    Vector(usize),
    /// SAM control range offset (0-31).
    Control(u16),
    Unmapped,
}
