// SPDX-License-Identifier: MIT
mod config;
mod convert;
mod error;
mod tbx;
mod tsv;
pub mod xml;

// re-export
pub use config::Config;
pub use convert::convert_tbx_file;
pub use error::{Error, Result};
pub use tbx::{extract_rows, parse_tbx_str, read_tbx_file, GlossaryRow, LanguagePair, TBX_NS};
pub use tsv::{write_tsv, write_tsv_file, HEADER, LINE_ENDING};
