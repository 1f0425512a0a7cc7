//! Human-readable model format: one `class_id ngram count` line per record.
//!
//! Word n-grams contain spaces, so the first and the last whitespace-delimited fields are the
//! class ID and the count, and everything between them is the n-gram re-joined by single spaces.

use std::io::{BufRead, Write};

use log::warn;

use crate::errors::{LidgramError, Result};
use crate::model::{Model, ModelRecord};

/// Parses one line of the text format.
///
/// # Errors
///
/// [`LidgramError::InvalidFormat`] will be returned if the line has fewer than three fields or
/// if the class ID or the count is not an unsigned 32-bit integer.
pub fn parse_text_line(line: &str) -> Result<ModelRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(LidgramError::invalid_format(format!(
            "expected at least 3 fields, got {}",
            fields.len()
        )));
    }
    let class_id = fields[0]
        .parse()
        .map_err(|_| LidgramError::invalid_format(format!("invalid class id '{}'", fields[0])))?;
    let last = fields[fields.len() - 1];
    let count = last
        .parse()
        .map_err(|_| LidgramError::invalid_format(format!("invalid count '{last}'")))?;
    let ngram = fields[1..fields.len() - 1].join(" ");
    Ok(ModelRecord::new(class_id, ngram.into_bytes(), count))
}

/// Returns `true` if `ngram` is non-empty and equals its whitespace-split fields re-joined by
/// single spaces.
fn is_normalized(ngram: &str) -> bool {
    ngram.split(' ').eq(ngram.split_whitespace())
}

impl Model {
    /// Writes the model in the text format.
    ///
    /// # Errors
    ///
    /// [`LidgramError::InvalidFormat`] will be returned if an n-gram is not valid UTF-8, which
    /// is the case for byte models containing boundary sentinels, or if it would not read back
    /// as itself: an empty n-gram, or one with leading, trailing or repeated whitespace, as
    /// code-point n-grams spanning a space usually have.
    pub fn write_text<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        for record in &self.records {
            let ngram = std::str::from_utf8(&record.ngram).map_err(|_| {
                LidgramError::invalid_format(format!(
                    "n-gram {:?} of class {} is not valid UTF-8",
                    record.ngram, record.class_id
                ))
            })?;
            if !is_normalized(ngram) {
                return Err(LidgramError::invalid_format(format!(
                    "n-gram {:?} of class {} does not survive whitespace splitting",
                    ngram, record.class_id
                )));
            }
            writeln!(wtr, "{} {} {}", record.class_id, ngram, record.count)?;
        }
        Ok(())
    }

    /// Reads a model in the text format.
    ///
    /// Blank lines are ignored; malformed lines are reported and skipped. The result is
    /// normalized like [`Model::from_records()`].
    pub fn read_text<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut records = vec![];
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_text_line(&line) {
                Ok(record) => records.push(record),
                Err(LidgramError::InvalidFormat(e)) => {
                    warn!("line {}: {}; skipping", i + 1, e.msg());
                }
                Err(e) => return Err(e),
            }
        }
        Self::from_records(records)
    }
}
