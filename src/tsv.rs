// SPDX-License-Identifier: MIT
//!
//! Write glossary rows as tab separated values
//!

use crate::error::{Error, Result};
use crate::tbx::GlossaryRow;

/// Header row of the output file
pub const HEADER: [&str; 2] = ["Source Term", "Target Term"];

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Write header and rows, returns the number of rows written
///
/// A term containing a tab, a double quote or a line break is quoted,
/// with inner quotes doubled. Other terms are written as is.
pub fn write_tsv<W: std::io::Write>(
    writer: &mut W,
    rows: &[GlossaryRow],
) -> std::io::Result<usize> {
    let terminator = if cfg!(windows) {
        csv::Terminator::CRLF
    } else {
        csv::Terminator::Any(b'\n')
    };
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(terminator)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record([&row.source_term, &row.target_term])?;
    }
    wtr.flush()?;

    Ok(rows.len())
}

/// Create (or truncate) TSV file and write header and rows
pub fn write_tsv_file<P: AsRef<std::path::Path>>(
    tsv_path: P,
    rows: &[GlossaryRow],
) -> Result<usize> {
    use std::io::Write;
    let tsv_path = tsv_path.as_ref();
    let write_err = |e| Error::OutputWrite {
        path: tsv_path.to_path_buf(),
        source: e,
    };

    let f = std::fs::File::create(tsv_path).map_err(write_err)?;
    let mut writer = std::io::BufWriter::new(f);
    let count = write_tsv(&mut writer, rows).map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    log::debug!("Wrote {} rows to {:?}", count, tsv_path);
    Ok(count)
}
