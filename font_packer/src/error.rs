/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{action} \"{}\": {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode input image \"{}\": {message}", .path.display())]
    ImageLoad { path: PathBuf, message: String },

    /// The atlas layout asks for a pixel the image does not have.
    #[error(
        "sample {index} maps to pixel ({x}, {y}), outside of the {width}x{height} input image"
    )]
    ImageAccess {
        index: usize,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_share_a_prefix() {
        assert_eq!(
            Error::from(ConfigError::ConflictingSentinels).to_string(),
            "invalid configuration: --on-index and --on-luma are mutually exclusive"
        );
        assert_eq!(
            Error::from(ConfigError::Zero("cell width")).to_string(),
            "invalid configuration: cell width must be at least 1"
        );
    }
}
