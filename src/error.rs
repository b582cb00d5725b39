// SPDX-License-Identifier: MIT
//!
//! Error types of TBX to TSV conversion
//!

use std::path::PathBuf;

/// Errors which abort one conversion run
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Input TBX file does not exist
    #[error("input file {} not found", .path.display())]
    InputNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input TBX file exists but can not be read
    #[error("can not read input file {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input is not well-formed XML
    #[error("malformed XML in {}: {source}", .path.display())]
    MalformedXml {
        path: PathBuf,
        source: crate::xml::XmlError,
    },

    /// Output TSV file can not be created or written
    #[error("can not write output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file exists but can not be read
    #[error("can not read config file {}: {source}", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has unknown keys
    #[error("can not parse config file {}: {source}", .path.display())]
    ConfigInvalid {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Error {
    /// Wrap an I/O error raised while reading the input file
    pub(crate) fn input<P: Into<PathBuf>>(path: P, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::InputNotFound {
                path: path.into(),
                source: err,
            }
        } else {
            Self::InputUnreadable {
                path: path.into(),
                source: err,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
