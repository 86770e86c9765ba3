//! SAM control register and the bit-alteration decoder.
//!
//! The 16 bits of state are changed by writes into a 32-byte range: odd
//! offsets set a bit, even offsets clear it, and `offset >> 1` picks the bit.
//!
//! | Offset | Bit | Field | Meaning                                      |
//! |--------|-----|-------|----------------------------------------------|
//! | 30-31  | 15  | TY    | Map type: 0 = RAM/ROM, 1 = all RAM           |
//! | 26-29  | 14-13 | M1:M0 | Memory size: 4K, 16K, 64K dyn, 64K static  |
//! | 22-25  | 12-11 | R1:R0 | MPU rate                                   |
//! | 20-21  | 10  | P1    | Page #1                                      |
//! | 6-19   | 9-3 | F6-F0 | Display offset (address = F << 9)            |
//! | 0-5    | 2-0 | V2-V0 | VDG addressing mode                          |

use crate::error::SamError;

/// A contiguous bit field inside the control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub shift: u8,
    pub width: u8,
}

impl Field {
    const fn new(shift: u8, width: u8) -> Self {
        Self { shift, width }
    }

    /// Register bits covered by this field.
    #[must_use]
    pub const fn mask(self) -> u16 {
        (((1u32 << self.width) - 1) << self.shift) as u16
    }

    /// Extract the field from a register value.
    #[must_use]
    pub const fn extract(self, value: u16) -> u16 {
        (value & self.mask()) >> self.shift
    }

    /// Replace the field inside a register value.
    #[must_use]
    pub const fn insert(self, value: u16, field: u16) -> u16 {
        (value & !self.mask()) | ((field << self.shift) & self.mask())
    }

    /// True if a change mask touches any bit of this field.
    #[must_use]
    pub const fn touched_by(self, change: u16) -> bool {
        change & self.mask() != 0
    }
}

pub const V: Field = Field::new(0, 3);
pub const F: Field = Field::new(3, 7);
pub const P1: Field = Field::new(10, 1);
pub const R0: Field = Field::new(11, 1);
pub const R1: Field = Field::new(12, 1);
pub const R: Field = Field::new(11, 2);
pub const M0: Field = Field::new(13, 1);
pub const M1: Field = Field::new(14, 1);
pub const M: Field = Field::new(13, 2);
pub const TY: Field = Field::new(15, 1);

/// Size of the control range in bytes.
pub const CONTROL_RANGE: u16 = 32;

/// The 16-bit SAM state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlRegister(u16);

impl ControlRegister {
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn get(self, field: Field) -> u16 {
        field.extract(self.0)
    }

    #[must_use]
    pub const fn flag(self, field: Field) -> bool {
        field.extract(self.0) != 0
    }

    pub fn set(&mut self, field: Field, value: u16) {
        self.0 = field.insert(self.0, value);
    }

    /// Apply a write to control offset `offset` (only the low five bits
    /// are decoded) and return the bits that changed.
    pub fn alter(&mut self, offset: u16) -> u16 {
        let mask = 1u16 << ((offset & (CONTROL_RANGE - 1)) >> 1);
        let new_state = if offset & 1 != 0 {
            self.0 | mask
        } else {
            self.0 & !mask
        };
        let change = self.0 ^ new_state;
        self.0 = new_state;
        change
    }

    /// Start address of the display, `F << 9`.
    #[must_use]
    pub const fn display_offset(self) -> u16 {
        self.get(F) << 9
    }

    #[must_use]
    pub const fn all_ram(self) -> bool {
        self.flag(TY)
    }

    #[must_use]
    pub const fn page_one(self) -> bool {
        self.flag(P1)
    }

    #[must_use]
    pub fn memory_size(self) -> MemorySize {
        match self.get(M) {
            0 => MemorySize::Size4K,
            1 => MemorySize::Size16K,
            2 => MemorySize::Dynamic64K,
            _ => MemorySize::Static64K,
        }
    }

    /// Current VDG addressing mode.
    ///
    /// # Panics
    ///
    /// The V field is three bits wide, so every value is a valid mode. A
    /// failure here means the register itself is corrupt.
    #[must_use]
    pub fn video_mode(self) -> VideoMode {
        match VideoMode::try_from(self.get(V) as u8) {
            Ok(mode) => mode,
            Err(e) => panic!("SAM register corrupt: {e}"),
        }
    }
}

/// Memory size selected by M1:M0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemorySize {
    Size4K,
    Size16K,
    Dynamic64K,
    Static64K,
}

impl MemorySize {
    /// The M1:M0 value that selects this size.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Size4K => 0,
            Self::Size16K => 1,
            Self::Dynamic64K => 2,
            Self::Static64K => 3,
        }
    }
}

/// VDG addressing mode selected by V2:V1:V0.
///
/// Each mode divides the counter clock differently; the video buffer sizes
/// are 512, 1024, 2048, 1536, 3072, 3072 and 6144 bytes. Mode 7 hands the
/// counter to DMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoMode {
    Mode0,
    Mode1,
    Mode2,
    Mode3,
    Mode4,
    Mode5,
    Mode6,
    Dma,
}

/// Bits cleared from the counter by horizontal sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncClear {
    /// B0-B3, carrying out of bit 3.
    Low4,
    /// B0-B4, carrying out of bit 4.
    Low5,
    None,
}

const X_DIVISION: [u8; 8] = [1, 3, 1, 2, 1, 1, 1, 1];
const Y_DIVISION: [u8; 8] = [12, 1, 3, 1, 2, 1, 1, 1];

impl VideoMode {
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Bit-3 carries needed to toggle bit 4.
    #[must_use]
    pub const fn x_division(self) -> u8 {
        X_DIVISION[self as usize]
    }

    /// Bit-4 carries needed to advance one row ($20).
    #[must_use]
    pub const fn y_division(self) -> u8 {
        Y_DIVISION[self as usize]
    }

    #[must_use]
    pub const fn sync_clear(self) -> SyncClear {
        match self {
            Self::Mode1 | Self::Mode3 | Self::Mode5 => SyncClear::Low4,
            Self::Mode0 | Self::Mode2 | Self::Mode4 | Self::Mode6 => SyncClear::Low5,
            Self::Dma => SyncClear::None,
        }
    }
}

impl TryFrom<u8> for VideoMode {
    type Error = SamError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Mode0,
            1 => Self::Mode1,
            2 => Self::Mode2,
            3 => Self::Mode3,
            4 => Self::Mode4,
            5 => Self::Mode5,
            6 => Self::Mode6,
            7 => Self::Dma,
            other => return Err(SamError::InvalidVideoMode(other)),
        })
    }
}
