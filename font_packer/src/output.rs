/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::{
    ffi::OsString,
    fmt::Write as _,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::{Error, Result};

/// Renders the bytes as `[1,2,3,]`. Every element is followed by a comma, the last one included.
pub fn format_array(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len() * 4 + 2);
    text.push('[');
    for byte in bytes {
        // Writing to a `String` cannot fail.
        let _ = write!(text, "{byte},");
    }
    text.push(']');
    text
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces the contents of `path`, which is only touched once everything has been written.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path = temp_path_for(path);
    debug!("Writing to \"{}\"", temp_path.display());

    let write = || {
        let mut file = File::create(&temp_path)
            .map_err(|err| Error::io("failed to create output file", &temp_path, err))?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|err| Error::io("failed to write to output file", &temp_path, err))
    };
    let res = write().and_then(|()| {
        fs::rename(&temp_path, path)
            .map_err(|err| Error::io("failed to replace output file", path, err))
    });

    if res.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    res
}
