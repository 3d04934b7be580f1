//! Decoding input documents.

use std::path::Path;

use crate::config::TextEncoding;
use crate::error::{AlignError, Result};

/// Decodes raw bytes with the given encoding.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String> {
    match encoding {
        TextEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| AlignError::Encoding(format!("invalid UTF-8: {}", e))),
        TextEncoding::Utf8Lossy => Ok(String::from_utf8_lossy(bytes).into_owned()),
        TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Reads a whole text document from disk.
pub fn read_text<P: AsRef<Path>>(path: P, encoding: TextEncoding) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AlignError::FileNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    let text = decode(&bytes, encoding)?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(text)
}
