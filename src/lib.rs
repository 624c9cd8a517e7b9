//! Message-to-raster printing for ESC/POS thermal receipt printers.
//!
//! The pipeline runs in fixed stages: a text template is filled in
//! ([`template`]), word-wrapped to the paper's column width ([`wrap`]),
//! rasterized to a grayscale page ([`render`], behind the `render` feature),
//! thresholded into a 1-bit packed bitmap ([`img`]), framed as ESC/POS
//! commands ([`frame`]) and finally written to the printer's USB bulk OUT
//! endpoint ([`printer`]).
//!
//! Every stage up to [`printer`] is pure and device-free, so a whole print
//! job can be built and inspected without hardware attached.

pub mod consts;
pub mod frame;
pub mod img;
pub mod printer;
#[cfg(feature = "render")]
pub mod render;
pub mod template;
pub mod wrap;

/// Print-head width in dots for 58mm ESC/POS printers (203 dpi).
///
/// Bitmaps wider than this are silently truncated by the binarizer; the
/// printer itself would drop the overflow anyway.
pub const PRINT_WIDTH: u32 = 384;

/// Default binarization threshold, compared against inverted luminance.
///
/// A pixel of luminance `r` prints when `255 - r >= threshold`, so 16 keeps
/// near-white anti-aliasing fringes off the paper.
pub const DEFAULT_THRESHOLD: u8 = 16;
