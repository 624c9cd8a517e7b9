//! Grayscale binarization into printer-ready packed bitmaps.

use image::{GrayImage, Luma};

/// A 1-bit-per-pixel bitmap packed the way GS v 0 expects it.
///
/// Rows are `bytes_width = ceil(width / 8)` bytes long and packed MSB-first:
/// the bit for pixel `(x, y)` lives at `data[y * bytes_width + x / 8]`, mask
/// `0x80 >> (x % 8)`, so the leftmost pixel of each 8-pixel group is the
/// high bit. A set bit is ink.
#[derive(Clone, Debug)]
pub struct PackedBitmap {
    width: usize,
    height: usize,
    bytes_width: usize,
    data: Vec<u8>,
}

impl PackedBitmap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row stride in bytes, `ceil(width / 8)`.
    pub fn bytes_width(&self) -> usize {
        self.bytes_width
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the pixel at `(x, y)` prints. Out-of-range coordinates are
    /// blank.
    pub fn bit(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[y * self.bytes_width + x / 8] & (0x80 >> (x % 8)) != 0
    }

    /// Expand back to a grayscale image (ink black on white), for saving a
    /// debug preview of exactly what the printer will receive.
    pub fn preview(&self) -> GrayImage {
        let mut img = GrayImage::from_pixel(
            self.width.max(1) as u32,
            self.height.max(1) as u32,
            Luma([255]),
        );
        for y in 0..self.height {
            for x in 0..self.width {
                if self.bit(x, y) {
                    img.put_pixel(x as u32, y as u32, Luma([0]));
                }
            }
        }
        img
    }
}

/// Threshold a grayscale page into a [`PackedBitmap`].
///
/// A source pixel of luminance `r` prints when `255 - r >= threshold`: the
/// comparison runs against the inverted value, so dark ink on a light
/// background sets bits where ink belongs. Columns beyond `max_width` are
/// silently dropped, mirroring the fixed print-head width; row bits past the
/// effective width stay zero up to the byte boundary.
pub fn binarize(img: &GrayImage, threshold: u8, max_width: u32) -> PackedBitmap {
    let width = img.width().min(max_width) as usize;
    let height = img.height() as usize;
    let bytes_width = (width + 7) / 8;
    let mut data = vec![0u8; bytes_width * height];

    for y in 0..height {
        for x in 0..width {
            let Luma([r]) = *img.get_pixel(x as u32, y as u32);
            if 255 - r >= threshold {
                data[y * bytes_width + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }

    PackedBitmap {
        width,
        height,
        bytes_width,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: u32, height: u32, lum: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([lum]))
    }

    #[test]
    fn stride_rounds_up_to_whole_bytes() {
        assert_eq!(binarize(&uniform(10, 1, 0), 16, 384).bytes_width(), 2);
        assert_eq!(binarize(&uniform(8, 1, 0), 16, 384).bytes_width(), 1);
    }

    #[test]
    fn all_white_yields_no_ink() {
        let bm = binarize(&uniform(16, 4, 255), 16, 384);
        assert!(bm.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn all_black_sets_every_bit_within_width() {
        let bm = binarize(&uniform(16, 2, 0), 16, 384);
        assert!(bm.data().iter().all(|&b| b == 0xff));
    }

    #[test]
    fn padding_bits_stay_clear() {
        // width 10: bits 10..15 of each row are padding
        let bm = binarize(&uniform(10, 1, 0), 16, 384);
        assert_eq!(bm.data(), &[0xff, 0b1100_0000]);
    }

    #[test]
    fn columns_beyond_max_width_are_dropped() {
        let bm = binarize(&uniform(500, 1, 0), 16, 384);
        assert_eq!(bm.width(), 384);
        assert_eq!(bm.bytes_width(), 48);
        assert_eq!(bm.data().len(), 48);
    }

    #[test]
    fn threshold_runs_against_inverted_luminance() {
        // luminance 240 -> ink value 15, just below threshold 16
        let bm = binarize(&uniform(8, 1, 240), 16, 384);
        assert_eq!(bm.data(), &[0x00]);
        // luminance 239 -> ink value 16, prints
        let bm = binarize(&uniform(8, 1, 239), 16, 384);
        assert_eq!(bm.data(), &[0xff]);
    }

    #[test]
    fn packing_is_msb_first() {
        let mut img = uniform(8, 1, 255);
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(7, 0, Luma([0]));
        let bm = binarize(&img, 16, 384);
        assert_eq!(bm.data(), &[0b1000_0001]);
        assert!(bm.bit(0, 0) && bm.bit(7, 0));
        assert!(!bm.bit(1, 0));
    }

    #[test]
    fn preview_round_trips_set_bits() {
        let mut img = uniform(10, 2, 255);
        img.put_pixel(9, 1, Luma([0]));
        let bm = binarize(&img, 16, 384);
        let preview = bm.preview();
        assert_eq!(preview.get_pixel(9, 1).0[0], 0);
        assert_eq!(preview.get_pixel(0, 0).0[0], 255);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        preview.save(&path).unwrap();
        assert!(path.exists());
    }
}
