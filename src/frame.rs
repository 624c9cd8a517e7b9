//! ESC/POS command frame builders.
//!
//! Every builder returns a complete, immutable byte frame; nothing here
//! touches the device. [`crate::printer::Printer`] hands each frame to the
//! transport in a single write.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::consts;
use crate::img::PackedBitmap;

#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    /// The protocol reserves exactly two bytes for raster width and height,
    /// so anything past 65535 must be rejected before framing.
    #[error("value {0} does not fit a 2-byte protocol field")]
    FieldOverflow(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// ESC @ reset frame.
pub fn init() -> Vec<u8> {
    consts::CMD_INIT.to_vec()
}

/// Single-line feed frame. The dialect has no count parameter; callers send
/// one frame per line fed.
pub fn feed_line() -> Vec<u8> {
    consts::CMD_FEED_LINE.to_vec()
}

/// Full-cut frame.
pub fn cut() -> Vec<u8> {
    consts::CMD_CUT.to_vec()
}

/// Encode `n` as the protocol's 2-byte little-endian field.
pub fn encode_le16(n: usize) -> Result<[u8; 2], EncodeError> {
    let v = u16::try_from(n).map_err(|_| EncodeError::FieldOverflow(n))?;
    let mut buf = [0u8; 2];
    (&mut buf[..]).write_u16::<LittleEndian>(v)?;
    Ok(buf)
}

/// GS v 0 raster frame: opcode, density byte, row width in bytes (LE16),
/// height in dots (LE16), then the packed payload.
///
/// Fails with [`EncodeError::FieldOverflow`] when either size field exceeds
/// 65535; oversized bitmaps are a hard input boundary, never truncated here.
pub fn raster(bitmap: &PackedBitmap) -> Result<Vec<u8>, EncodeError> {
    let bytes_width = encode_le16(bitmap.bytes_width())?;
    let height = encode_le16(bitmap.height())?;

    let mut buf = Vec::with_capacity(consts::CMD_RASTER.len() + 5 + bitmap.data().len());
    buf.extend_from_slice(consts::CMD_RASTER);
    buf.push(consts::RASTER_DENSITY_NORMAL);
    buf.extend_from_slice(&bytes_width);
    buf.extend_from_slice(&height);
    buf.extend_from_slice(bitmap.data());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::img::binarize;
    use image::{GrayImage, Luma};

    #[test]
    fn fixed_frames_match_the_wire_format() {
        assert_eq!(init(), vec![0x1b, 0x40]);
        assert_eq!(feed_line(), vec![0x1b, 0x64, 0x01]);
        assert_eq!(cut(), vec![0x1d, 0x56, 0x41]);
    }

    #[test]
    fn le16_encoding() {
        assert_eq!(encode_le16(0).unwrap(), [0, 0]);
        assert_eq!(encode_le16(300).unwrap(), [44, 1]);
        assert_eq!(encode_le16(65535).unwrap(), [0xff, 0xff]);
        assert!(matches!(
            encode_le16(65536),
            Err(EncodeError::FieldOverflow(65536))
        ));
    }

    #[test]
    fn raster_frame_for_a_black_16x1_bitmap() {
        let page = GrayImage::from_pixel(16, 1, Luma([0]));
        let bitmap = binarize(&page, 16, 384);
        let frame = raster(&bitmap).unwrap();
        assert_eq!(
            frame,
            vec![0x1d, 0x76, 0x30, 0x00, 0x02, 0x00, 0x01, 0x00, 0xff, 0xff]
        );
    }

    #[test]
    fn oversized_bitmap_is_rejected_not_truncated() {
        let page = GrayImage::from_pixel(1, 70000, Luma([0]));
        let bitmap = binarize(&page, 16, 384);
        assert!(matches!(
            raster(&bitmap),
            Err(EncodeError::FieldOverflow(70000))
        ));
    }
}
