/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::source::Sentinel;

pub const DEFAULT_INPUT: &str = "font.png";
pub const DEFAULT_OUTPUT: &str = "font_data.txt";
pub const DEFAULT_CELL_WIDTH: usize = 6;
pub const DEFAULT_CELL_HEIGHT: usize = 8;
pub const DEFAULT_GLYPHS_PER_ROW: usize = 16;
/// Printable ASCII, from space to DEL.
pub const DEFAULT_GLYPH_COUNT: usize = 96;
/// Anything larger than this is almost certainly a typo.
pub const MAX_CELL_SIZE: usize = 256;
/// The whole Basic Multilingual Plane.
pub const MAX_GLYPH_COUNT: usize = 0x10000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    Zero(&'static str),
    #[error("{name} is {value} pixels, but cells can be at most {} pixels", MAX_CELL_SIZE)]
    CellTooLarge { name: &'static str, value: usize },
    #[error("cannot pack {0} glyphs, the maximum is {}", MAX_GLYPH_COUNT)]
    TooManyGlyphs(usize),
    #[error("the atlas layout has too many pixels to sample")]
    Overflow,
    #[error("--on-index and --on-luma are mutually exclusive")]
    ConflictingSentinels,
    #[error("palette index {index} was requested as the \"on\" colour, but the image only has {palette_len} colours")]
    IndexNotInPalette { index: u8, palette_len: usize },
}

/// What to do with the last few samples when the total isn't a multiple of 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialByte {
    #[default]
    Drop,
    /// Emit it, with the missing high bits left clear.
    Pad,
}

/// Grid geometry of the glyph atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    pub cell_width: usize,
    pub cell_height: usize,
    pub glyphs_per_row: usize,
    pub glyph_count: usize,
}

impl Default for AtlasLayout {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            glyphs_per_row: DEFAULT_GLYPHS_PER_ROW,
            glyph_count: DEFAULT_GLYPH_COUNT,
        }
    }
}

impl AtlasLayout {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("cell width", self.cell_width),
            ("cell height", self.cell_height),
            ("glyphs per row", self.glyphs_per_row),
            ("glyph count", self.glyph_count),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        for (name, value) in [
            ("cell width", self.cell_width),
            ("cell height", self.cell_height),
        ] {
            if value > MAX_CELL_SIZE {
                return Err(ConfigError::CellTooLarge { name, value });
            }
        }
        if self.glyph_count > MAX_GLYPH_COUNT {
            return Err(ConfigError::TooManyGlyphs(self.glyph_count));
        }

        self.checked_sample_count().ok_or(ConfigError::Overflow)?;
        self.cell_width
            .checked_mul(self.glyphs_per_row)
            .ok_or(ConfigError::Overflow)?;
        Ok(())
    }

    fn checked_sample_count(&self) -> Option<usize> {
        self.cell_width
            .checked_mul(self.cell_height)?
            .checked_mul(self.glyph_count)
    }

    /// Width of one row of the atlas, in pixels; this is the sampling stride.
    pub fn atlas_width(&self) -> usize {
        self.cell_width * self.glyphs_per_row
    }

    /// Number of pixels sampled, one bit each.
    pub fn sample_count(&self) -> usize {
        self.cell_width * self.cell_height * self.glyph_count
    }

    /// Number of pixel rows the sampling walks through.
    pub fn rows_needed(&self) -> usize {
        let (nb_samples, stride) = (self.sample_count(), self.atlas_width());
        nb_samples / stride + usize::from(nb_samples % stride != 0)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub layout: AtlasLayout,
    pub sentinel: Sentinel,
    pub partial_byte: PartialByte,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: DEFAULT_INPUT.into(),
            output_path: DEFAULT_OUTPUT.into(),
            layout: AtlasLayout::default(),
            sentinel: Sentinel::default(),
            partial_byte: PartialByte::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()
    }
}
