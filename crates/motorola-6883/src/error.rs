//! Errors raised by the SAM.

use thiserror::Error;

/// Errors raised by the SAM.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamError {
    /// The attached RAM is not a size the SAM can address. The chip cannot
    /// start.
    #[error(
        "MC6883 only supports RAM configurations of 4096, 8192, 16384, 32768, or 65536 bytes (got {0})"
    )]
    UnsupportedRamSize(usize),

    /// A video mode value outside the 3-bit V field.
    #[error("invalid SAM video mode {0} (V field is 3 bits)")]
    InvalidVideoMode(u8),

    /// A snapshot field is outside the range the hardware can hold.
    #[error("invalid SAM snapshot: {field} = {value}")]
    InvalidSnapshot { field: &'static str, value: u32 },
}
