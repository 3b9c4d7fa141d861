/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use log::debug;

use crate::{
    config::{AtlasLayout, PartialByte},
    error::{Error, Result},
    source::PixelSource,
};

/// Samples the atlas in row-major order, packing 8 pixels per byte, LSB first.
///
/// Pixel `i` is read at `(i % atlas_width, i / atlas_width)`, so glyphs are not
/// extracted one by one; the atlas is treated as a single long strip of bits.
/// The layout must have been validated beforehand.
pub fn pack(
    source: &impl PixelSource,
    layout: &AtlasLayout,
    partial_byte: PartialByte,
) -> Result<Vec<u8>> {
    let (width, height) = (source.width(), source.height());
    let stride = layout.atlas_width();
    let nb_samples = layout.sample_count();
    debug!(
        "Sampling {nb_samples} pixels over {}x{} from a {width}x{height} image",
        stride,
        layout.rows_needed()
    );

    // Sampling stops at the first pixel outside of the image.
    let mut bytes = Vec::with_capacity(nb_samples.min(width.saturating_mul(height)) / 8 + 1);
    let mut byte = 0u8;
    for i in 0..nb_samples {
        let (x, y) = (i % stride, i / stride);
        if x >= width || y >= height {
            return Err(Error::ImageAccess {
                index: i,
                x,
                y,
                width,
                height,
            });
        }

        if source.is_on(x, y) {
            byte |= 1 << (i % 8);
        }
        if (i + 1) % 8 == 0 {
            bytes.push(byte);
            byte = 0;
        }
    }

    if nb_samples % 8 != 0 {
        match partial_byte {
            PartialByte::Drop => debug!(
                "Dropping the last {} samples, which don't fill a byte",
                nb_samples % 8
            ),
            PartialByte::Pad => bytes.push(byte),
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory image, one bool per pixel.
    struct Grid {
        width: usize,
        height: usize,
        pixels: Vec<bool>,
    }

    impl Grid {
        fn filled(width: usize, height: usize, on: bool) -> Self {
            Self {
                width,
                height,
                pixels: vec![on; width * height],
            }
        }

        fn set(&mut self, x: usize, y: usize) {
            self.pixels[y * self.width + x] = true;
        }
    }

    impl PixelSource for Grid {
        fn width(&self) -> usize {
            self.width
        }

        fn height(&self) -> usize {
            self.height
        }

        fn is_on(&self, x: usize, y: usize) -> bool {
            self.pixels[y * self.width + x]
        }
    }

    fn layout(cell_width: usize, cell_height: usize) -> AtlasLayout {
        AtlasLayout {
            cell_width,
            cell_height,
            ..AtlasLayout::default()
        }
    }

    /// An image exactly big enough for the layout.
    fn grid_for(layout: &AtlasLayout, on: bool) -> Grid {
        Grid::filled(layout.atlas_width(), layout.rows_needed(), on)
    }

    #[test]
    fn all_on() {
        let layout = layout(16, 1);
        let bytes = pack(&grid_for(&layout, true), &layout, PartialByte::Drop).unwrap();
        assert_eq!(bytes.len(), 16 * 96 / 8);
        assert!(bytes.iter().all(|&byte| byte == 255));
    }

    #[test]
    fn all_off() {
        let layout = AtlasLayout::default();
        let bytes = pack(&grid_for(&layout, false), &layout, PartialByte::Drop).unwrap();
        assert_eq!(bytes.len(), 6 * 8 * 96 / 8);
        assert!(bytes.iter().all(|&byte| byte == 0));
    }

    #[test]
    fn first_pixel_is_lowest_bit() {
        let layout = AtlasLayout::default();
        let mut grid = grid_for(&layout, false);
        grid.set(0, 0);
        let bytes = pack(&grid, &layout, PartialByte::Drop).unwrap();
        assert_eq!(bytes[0], 1);
        assert!(bytes[1..].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn bits_follow_row_major_order() {
        let layout = AtlasLayout::default();
        let mut grid = grid_for(&layout, false);
        // Sample 7 is the top bit of byte 0; the first pixel of row 1 is sample 96, i.e. byte 12.
        grid.set(7, 0);
        grid.set(0, 1);
        grid.set(2, 1);
        let bytes = pack(&grid, &layout, PartialByte::Drop).unwrap();
        assert_eq!(bytes[0], 0x80);
        assert_eq!(bytes[12], 0b101);
        assert_eq!(bytes.iter().filter(|&&byte| byte != 0).count(), 2);
    }

    #[test]
    fn glyphs_per_row_sets_the_stride() {
        let layout = AtlasLayout {
            cell_width: 4,
            cell_height: 2,
            glyphs_per_row: 2,
            glyph_count: 4,
        };
        // 8-pixel rows, 4 of them.
        let mut grid = Grid::filled(8, 4, false);
        for y in 0..4 {
            grid.set(y, y);
        }
        let bytes = pack(&grid, &layout, PartialByte::Drop).unwrap();
        assert_eq!(bytes, [0b0001, 0b0010, 0b0100, 0b1000]);
    }

    #[test]
    fn partial_byte_is_dropped_by_default() {
        // 45 samples: 5 full bytes, and 5 bits left over.
        let layout = AtlasLayout {
            cell_width: 3,
            cell_height: 3,
            glyphs_per_row: 4,
            glyph_count: 5,
        };
        let grid = grid_for(&layout, true);

        let dropped = pack(&grid, &layout, PartialByte::Drop).unwrap();
        assert_eq!(dropped, [255; 5]);

        let padded = pack(&grid, &layout, PartialByte::Pad).unwrap();
        assert_eq!(padded, [255, 255, 255, 255, 255, 0b11111]);
    }

    #[test]
    fn fewer_than_8_samples() {
        let layout = AtlasLayout {
            cell_width: 1,
            cell_height: 1,
            glyphs_per_row: 16,
            glyph_count: 3,
        };
        let grid = grid_for(&layout, true);
        assert!(pack(&grid, &layout, PartialByte::Drop).unwrap().is_empty());
        assert_eq!(pack(&grid, &layout, PartialByte::Pad).unwrap(), [0b111]);
    }

    #[test]
    fn image_too_narrow() {
        let layout = AtlasLayout::default();
        let grid = Grid::filled(95, 48, true);
        match pack(&grid, &layout, PartialByte::Drop) {
            Err(Error::ImageAccess {
                index,
                x,
                y,
                width,
                height,
            }) => assert_eq!((index, x, y, width, height), (95, 95, 0, 95, 48)),
            other => panic!("expected an out-of-bounds error, got {other:?}"),
        }
    }

    #[test]
    fn image_too_short() {
        let layout = AtlasLayout::default();
        let grid = Grid::filled(96, 47, true);
        match pack(&grid, &layout, PartialByte::Drop) {
            Err(Error::ImageAccess { index, x, y, .. }) => {
                assert_eq!((index, x, y), (96 * 47, 0, 47))
            }
            other => panic!("expected an out-of-bounds error, got {other:?}"),
        }
    }

    #[test]
    fn huge_glyph_count_on_a_small_image() {
        let layout = AtlasLayout {
            glyph_count: 1_000_000_000_000_000,
            ..AtlasLayout::default()
        };
        let grid = Grid::filled(96, 48, true);
        match pack(&grid, &layout, PartialByte::Drop) {
            Err(Error::ImageAccess { index, x, y, .. }) => {
                assert_eq!((index, x, y), (96 * 48, 0, 48))
            }
            other => panic!("expected an out-of-bounds error, got {other:?}"),
        }
    }

    #[test]
    fn larger_images_are_fine() {
        let layout = AtlasLayout::default();
        let mut grid = Grid::filled(200, 100, false);
        grid.set(96, 0); // Outside of the sampled area.
        let bytes = pack(&grid, &layout, PartialByte::Drop).unwrap();
        assert!(bytes.iter().all(|&byte| byte == 0));
    }

    #[test]
    fn packing_is_repeatable() {
        let layout = layout(8, 8);
        let mut grid = grid_for(&layout, false);
        for i in (0..grid.pixels.len()).step_by(7) {
            grid.pixels[i] = true;
        }
        let first = pack(&grid, &layout, PartialByte::Drop).unwrap();
        let second = pack(&grid, &layout, PartialByte::Drop).unwrap();
        assert_eq!(first, second);
    }
}
