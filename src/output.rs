//! Saving segmented sentences to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::error::Result;
use crate::segmentation::SentenceSequence;

/// Timestamp layout appended to saved file stems.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes one sentence per line to `<dir>/<stem>_<timestamp>.txt`.
///
/// `original_name` is the name of the source document; only its stem is
/// used. The directory is created if missing. Returns the written path.
pub fn write_sentences<P: AsRef<Path>>(
    dir: P,
    original_name: &str,
    sentences: &SentenceSequence,
) -> Result<PathBuf> {
    write_sentences_at(dir, original_name, sentences, Local::now().naive_local())
}

/// Like [`write_sentences`] with an explicit timestamp.
pub fn write_sentences_at<P: AsRef<Path>>(
    dir: P,
    original_name: &str,
    sentences: &SentenceSequence,
    timestamp: NaiveDateTime,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("sentences");
    let path = dir.join(format!("{}_{}.txt", stem, timestamp.format(TIMESTAMP_FORMAT)));

    let mut contents = sentences.texts().join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    fs::write(&path, contents)?;

    log::info!("Saved {} sentences to {}", sentences.len(), path.display());
    Ok(path)
}
