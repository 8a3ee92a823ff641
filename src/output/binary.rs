//! Flat float32 point files.
//!
//! Layout: records back to back, each `x, y, z, weight` as native-endian
//! `f32`. No header, no length prefix, no padding; file length is always
//! `16 * count`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::core::{PointRecord, RecordSet, RECORD_SIZE};
use crate::util::{Error, Result};

/// Write `records` to `path`, replacing any existing file.
pub fn write_records(path: impl AsRef<Path>, records: &RecordSet) -> Result<u64> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(records.as_bytes())?;
    out.flush()?;

    let len = records.as_bytes().len() as u64;
    debug!("Wrote {} records ({} bytes) to {}", records.len(), len, path.display());
    Ok(len)
}

/// Read a point file written by [`write_records`].
pub fn read_records(path: impl AsRef<Path>) -> Result<RecordSet> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::open(e, path))?;
    decode_records(&bytes)
}

/// Decode packed records from bytes.
pub fn decode_records(bytes: &[u8]) -> Result<RecordSet> {
    if bytes.len() % RECORD_SIZE != 0 {
        return Err(Error::TruncatedRecords(bytes.len() as u64));
    }
    // The buffer is not guaranteed to be 4-byte aligned.
    let records: Vec<PointRecord> = bytes
        .chunks_exact(RECORD_SIZE)
        .map(bytemuck::pod_read_unaligned::<PointRecord>)
        .collect();
    Ok(RecordSet::from(records))
}
