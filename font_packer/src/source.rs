/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::{fs::File, path::Path};

use log::{debug, info, warn};
use plumers::prelude::*;
use slicedisplay::SliceDisplay;

use crate::{
    config::ConfigError,
    error::{Error, Result},
};

/// Something the packer can sample pixels from.
pub trait PixelSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Only called with in-bounds coordinates.
    fn is_on(&self, x: usize, y: usize) -> bool;
}

/// Decides which pixels count as "on".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// The pixel's palette index must be exactly this.
    Index(u8),
    /// The pixel's colour must be at least this bright (0-255).
    MinLuma(u8),
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::Index(1)
    }
}

impl Sentinel {
    /// Picks the sentinel from the `--on-index` and `--on-luma` flags; at most one may be set.
    pub fn from_flags(on_index: Option<u8>, on_luma: Option<u8>) -> Result<Self, ConfigError> {
        match (on_index, on_luma) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingSentinels),
            (Some(index), None) => Ok(Self::Index(index)),
            (None, Some(min)) => Ok(Self::MinLuma(min)),
            (None, None) => Ok(Self::default()),
        }
    }

    /// Palette indices are compared as stored in the file, so an existing palette must be left alone.
    fn load_flags(&self) -> LoadFlags {
        let keep_palette = matches!(self, Self::Index(_));
        LoadFlags {
            remove_alpha: false,
            // Palettes built from scratch (e.g. for grayscale images) are always sorted.
            // Dark first puts white at index 1 in a black & white image.
            palette_sort: PaletteSort::DarkFirst,
            sort_existing: !keep_palette,
            reduce_palette: !keep_palette,
        }
    }

    fn matches(&self, index: u8, lumas: &[u8]) -> bool {
        match *self {
            Self::Index(on) => index == on,
            Self::MinLuma(min) => lumas
                .get(usize::from(index))
                .is_some_and(|&luma| luma >= min),
        }
    }
}

/// Perceived brightness of a 15-bit colour, red in the low bits.
fn luma(colour: u16) -> u8 {
    let expand = |channel: u16| {
        let channel = u32::from(channel & 0x1f);
        (channel << 3) | (channel >> 2)
    };
    let red = expand(colour);
    let green = expand(colour >> 5);
    let blue = expand(colour >> 10);
    ((red * 299 + green * 587 + blue * 114) / 1000) as u8
}

/// A font atlas loaded from disk.
pub struct FontImage {
    img: PalettedImage16,
    lumas: Vec<u8>,
    sentinel: Sentinel,
}

impl FontImage {
    pub fn load(path: &Path, sentinel: Sentinel) -> Result<Self> {
        let input =
            File::open(path).map_err(|err| Error::io("failed to open input image", path, err))?;
        let img = PalettedImage16::load(input, sentinel.load_flags(), AlphaMode::ZeroIsOpaque)
            .map_err(|err| Error::ImageLoad {
                path: path.to_owned(),
                message: err.to_string(),
            })?;

        info!(
            "Loaded \"{}\" ({}x{}, {} colours)",
            path.display(),
            img.width(),
            img.height(),
            img.palette().len()
        );
        debug!("Image palette: {}", img.palette().display());
        if img.nb_frames() != 1 {
            warn!(
                "The input image contains {} frames, but only the first one will be processed",
                img.nb_frames()
            );
        }

        if let Sentinel::Index(index) = sentinel {
            let palette_len = img.palette().len();
            if usize::from(index) >= palette_len {
                return Err(ConfigError::IndexNotInPalette { index, palette_len }.into());
            }
        }

        let lumas = img.palette().iter().map(|colour| luma(colour.0)).collect();
        Ok(Self {
            img,
            lumas,
            sentinel,
        })
    }
}

impl PixelSource for FontImage {
    fn width(&self) -> usize {
        self.img.width()
    }

    fn height(&self) -> usize {
        self.img.height()
    }

    fn is_on(&self, x: usize, y: usize) -> bool {
        self.sentinel.matches(self.img.frame(0)[(x, y)], &self.lumas)
    }
}
