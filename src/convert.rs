// SPDX-License-Identifier: MIT
//!
//! Convert TBX file into TSV glossary
//!

use crate::error::Result;
use crate::{tbx, tsv};

/// Convert TBX file into bilingual TSV glossary
///
/// Returns the number of term pairs written. The output file is only
/// touched after the input has been parsed successfully.
pub fn convert_tbx_file<P: AsRef<std::path::Path>, Q: AsRef<std::path::Path>>(
    src_path: P,
    dst_path: Q,
    langs: &tbx::LanguagePair,
) -> Result<usize> {
    let rows = tbx::read_tbx_file(&src_path, langs)?;

    if rows.is_empty() {
        log::warn!(
            "No termEntry in {:?} has both {:?} and {:?} terms, writing header only",
            src_path.as_ref(),
            langs.source,
            langs.target
        );
    }

    tsv::write_tsv_file(dst_path, &rows)
}
