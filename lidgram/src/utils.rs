use std::io::{self, Read};

use crate::errors::{LidgramError, Result};

/// Reads a little-endian `u32`, distinguishing a clean end of stream from a partial value.
///
/// Returns `Ok(None)` if no byte is available.
pub fn read_u32_or_eof<R>(mut rdr: R) -> Result<Option<u32>>
where
    R: Read,
{
    let mut buf = [0; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match rdr.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => Ok(None),
        4 => Ok(Some(u32::from_le_bytes(buf))),
        _ => Err(LidgramError::invalid_format(format!(
            "stream ends after {filled} byte(s) of a 4-byte field"
        ))),
    }
}

/// Converts an unexpected end of stream into a format error.
pub fn truncated(error: io::Error, field: &str) -> LidgramError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        LidgramError::invalid_format(format!("stream ends inside `{field}`"))
    } else {
        error.into()
    }
}
