//! CSV decoder for the collision dataset.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;

use crate::record::RawCrashRow;

/// Decodes a CSV payload into raw rows.
///
/// # Errors
///
/// Returns an error if the payload is not valid CSV or a mapped column
/// holds a value of the wrong type.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<RawCrashRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let row: RawCrashRow =
            result.with_context(|| format!("Failed to decode CSV record {}", line + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Gunzips `bytes` when `name` ends in `.gz`, otherwise returns them as-is.
pub fn decompress_if_gzipped(name: &str, bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !name.ends_with(".gz") {
        return Ok(bytes);
    }

    let mut decoder = GzDecoder::new(bytes.as_slice());
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .with_context(|| format!("Failed to gunzip '{name}'"))?;
    Ok(out)
}
