/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::{path::PathBuf, process::ExitCode};

use log::info;

mod config;
mod error;
mod output;
mod pack;
mod source;

use config::{Config, PartialByte};
use error::{Error, Result};
use source::{FontImage, Sentinel};

fn main() -> ExitCode {
    let args = xflags::parse_or_exit! {
        /// Font image file to process [default: font.png]
        optional -i, --input input_path: PathBuf
        /// Path to write the packed font to [default: font_data.txt]
        optional -o, --output output_path: PathBuf
        /// Width of one glyph cell, in pixels [default: 6]
        optional --cell-width cell_width: usize
        /// Height of one glyph cell, in pixels [default: 8]
        optional --cell-height cell_height: usize
        /// How many glyph cells make up one row of the image [default: 16]
        optional --glyphs-per-row glyphs_per_row: usize
        /// How many glyphs to pack [default: 96]
        optional --glyph-count glyph_count: usize
        /// Palette index (after sorting dark to light) of "on" pixels [default: 1]
        optional --on-index on_index: u8
        /// Treat pixels at least this bright (0-255) as "on", instead of matching a palette index
        optional --on-luma on_luma: u8
        /// Emit a last, incomplete byte instead of dropping it
        optional --pad-partial
        /// Log progress
        optional -v, --verbose
        /// Only log errors
        optional -q, --quiet
    };

    let level = match (args.verbose, args.quiet) {
        (true, _) => "debug",
        (false, true) => "error",
        (false, false) => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let sentinel = match Sentinel::from_flags(args.on_index, args.on_luma) {
        Ok(sentinel) => sentinel,
        Err(err) => return report(err.into()),
    };
    let mut config = Config {
        sentinel,
        ..Config::default()
    };
    if let Some(input_path) = args.input {
        config.input_path = input_path;
    }
    if let Some(output_path) = args.output {
        config.output_path = output_path;
    }
    let layout = &mut config.layout;
    for (field, arg) in [
        (&mut layout.cell_width, args.cell_width),
        (&mut layout.cell_height, args.cell_height),
        (&mut layout.glyphs_per_row, args.glyphs_per_row),
        (&mut layout.glyph_count, args.glyph_count),
    ] {
        if let Some(value) = arg {
            *field = value;
        }
    }
    if args.pad_partial {
        config.partial_byte = PartialByte::Pad;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn report(err: Error) -> ExitCode {
    eprintln!("Error: {err}");
    ExitCode::FAILURE
}

fn run(config: &Config) -> Result<()> {
    config.validate()?;

    let img = FontImage::load(&config.input_path, config.sentinel)?;
    let bytes = pack::pack(&img, &config.layout, config.partial_byte)?;
    output::write_atomic(&config.output_path, &output::format_array(&bytes))?;

    info!(
        "Wrote {} bytes to \"{}\"",
        bytes.len(),
        config.output_path.display()
    );
    Ok(())
}
