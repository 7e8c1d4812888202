//! Compressed local snapshots of record sets.
//!
//! The loader writes one snapshot per logical source after every successful
//! fetch and reads it back as the middle layer of its fallback chain
//! (primary -> backup -> stale cache).

use crate::record::Record;
use bincode::{deserialize_from, serialize_into};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

fn backup_path(dir: &Path, source_name: &str) -> PathBuf {
    dir.join(format!("{source_name}.bin.gz"))
}

/// Write a gzip-compressed snapshot of a record set.
///
/// # Arguments
/// * `dir` - Backup directory, created if missing
/// * `source_name` - Logical source name; becomes `{name}.bin.gz`
/// * `records` - The record set to snapshot
pub fn save_records(dir: &Path, source_name: &str, records: &[Record]) -> std::io::Result<()> {
    create_dir_all(dir)?;
    let file = File::create(backup_path(dir, source_name))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = std::io::BufWriter::new(encoder);

    serialize_into(&mut writer, records)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(())
}

/// Read back the snapshot for a logical source.
pub fn load_records(dir: &Path, source_name: &str) -> std::io::Result<Vec<Record>> {
    let file = File::open(backup_path(dir, source_name))?;
    let decoder = GzDecoder::new(file);
    let mut reader = std::io::BufReader::new(decoder);

    let records: Vec<Record> = deserialize_from(&mut reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    Ok(records)
}

/// Whether a snapshot exists for a logical source.
pub fn has_backup(dir: &Path, source_name: &str) -> bool {
    backup_path(dir, source_name).exists()
}
