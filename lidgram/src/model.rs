use std::io::{Read, Write};
use std::mem;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::accumulator::ModelAccumulator;
use crate::errors::{LidgramError, Result};
use crate::utils;

/// Count of one n-gram within one class.
///
/// On disk, a record is laid out as follows, with every integer unsigned and little-endian:
///
/// ```text
/// u32     class_id
/// u32     ngram_byte_length
/// [u8]    ngram
/// u32     count
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModelRecord {
    pub(crate) class_id: u32,
    pub(crate) ngram: Vec<u8>,
    pub(crate) count: u32,
}

impl ModelRecord {
    /// Creates a new record.
    pub const fn new(class_id: u32, ngram: Vec<u8>, count: u32) -> Self {
        Self {
            class_id,
            ngram,
            count,
        }
    }

    pub const fn class_id(&self) -> u32 {
        self.class_id
    }

    /// Gets the canonical bytes of the n-gram.
    pub fn ngram(&self) -> &[u8] {
        &self.ngram
    }

    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Gets the number of bytes this record occupies on disk.
    pub fn serialized_len(&self) -> usize {
        mem::size_of::<u32>() * 3 + self.ngram.len()
    }

    pub fn serialize<W>(&self, mut buf: W) -> Result<usize>
    where
        W: Write,
    {
        let ngram_size = self.ngram.len();
        buf.write_u32::<LittleEndian>(self.class_id)?;
        buf.write_u32::<LittleEndian>(ngram_size.try_into()?)?;
        buf.write_all(&self.ngram)?;
        buf.write_u32::<LittleEndian>(self.count)?;
        Ok(mem::size_of::<u32>() * 3 + ngram_size)
    }

    /// Reads one record.
    ///
    /// # Returns
    ///
    /// `None` if the stream ends exactly at a record boundary.
    ///
    /// # Errors
    ///
    /// [`LidgramError::InvalidFormat`] will be returned if the stream ends inside a record.
    pub fn deserialize<R>(mut buf: R) -> Result<Option<Self>>
    where
        R: Read,
    {
        let class_id = match utils::read_u32_or_eof(&mut buf)? {
            Some(class_id) => class_id,
            None => return Ok(None),
        };
        let ngram_size = buf
            .read_u32::<LittleEndian>()
            .map_err(|e| utils::truncated(e, "ngram_byte_length"))?;
        // Reads through `take()` so that a corrupted length cannot force a huge allocation.
        let mut ngram = vec![];
        let n_read = buf
            .by_ref()
            .take(u64::from(ngram_size))
            .read_to_end(&mut ngram)?;
        if n_read != usize::try_from(ngram_size)? {
            return Err(LidgramError::invalid_format(format!(
                "stream ends inside `ngram` ({n_read} of {ngram_size} bytes)"
            )));
        }
        let count = buf
            .read_u32::<LittleEndian>()
            .map_err(|e| utils::truncated(e, "count"))?;
        Ok(Some(Self {
            class_id,
            ngram,
            count,
        }))
    }
}

/// Frequency-count model: a sequence of [`ModelRecord`]s without header or footer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub(crate) records: Vec<ModelRecord>,
}

impl Model {
    /// Creates a model from arbitrary records.
    ///
    /// Records sharing a `(class_id, ngram)` key are summed into one, and the result is sorted
    /// by `(class_id, ngram)` so that identical inputs always serialize identically.
    ///
    /// # Errors
    ///
    /// [`LidgramError::CastError`] will be returned if a summed count exceeds `u32::MAX`.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = ModelRecord>,
    {
        let mut acc = ModelAccumulator::new();
        acc.extend_records(records);
        acc.into_model()
    }

    /// Merges several models by summing the counts of identical keys.
    ///
    /// The result does not depend on the order of `models`.
    pub fn merge<I>(models: I) -> Result<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut acc = ModelAccumulator::new();
        for model in models {
            acc.extend_records(model.records);
        }
        acc.into_model()
    }

    pub fn records(&self) -> &[ModelRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ModelRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exports the model data.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<usize>
    where
        W: Write,
    {
        let mut total_size = 0;
        for record in &self.records {
            total_size += record.serialize(&mut wtr)?;
        }
        Ok(total_size)
    }

    /// Creates a model from a reader.
    ///
    /// Records are kept exactly as stored, in file order.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Errors
    ///
    /// [`LidgramError::InvalidFormat`] will be returned if the stream is truncated mid-record.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut records = vec![];
        let mut offset = 0;
        loop {
            match ModelRecord::deserialize(&mut rdr) {
                Ok(Some(record)) => {
                    offset += record.serialized_len();
                    records.push(record);
                }
                Ok(None) => break,
                Err(LidgramError::InvalidFormat(e)) => {
                    return Err(LidgramError::invalid_format(format!(
                        "record #{} at byte {}: {}",
                        records.len(),
                        offset,
                        e.msg
                    )));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Self { records })
    }
}
