//! ESC/POS command tables used by the frame builders.
//!
//! Fixed opcode sequences only; parameterized fields (sizes, payloads) are
//! appended by [`crate::frame`].

pub const ESC: u8 = 0x1b;
pub const GS: u8 = 0x1d;
pub const NUL: u8 = 0x00;
pub const LF: u8 = 0x0a;

/// ESC @ - Initialize printer, clear the print buffer and restore the
/// power-on print mode. The receive buffer is not cleared.
pub const CMD_INIT: &[u8] = &[ESC, 0x40];

/// ESC d 1 - Print buffer contents and feed exactly one line.
///
/// The dialect takes no repeat count; feeding n lines means sending this
/// frame n times.
pub const CMD_FEED_LINE: &[u8] = &[ESC, 0x64, 0x01];

/// GS V A - Feed to the cut position and perform a full cut.
pub const CMD_CUT: &[u8] = &[GS, 0x56, 0x41];

/// GS v 0 - Raster bit image. Followed by one density byte, the row width
/// in bytes (LE16), the height in dots (LE16) and the packed payload.
pub const CMD_RASTER: &[u8] = &[GS, 0x76, 0x30];

/// Density byte for GS v 0: normal (no pixel doubling).
pub const RASTER_DENSITY_NORMAL: u8 = 0x00;
