use crate::archive::error::{ArchiveError, ArchiveResult};
use log::debug;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub mod error;

/// Builds a ZIP archive in memory from named byte buffers.
pub struct ZipArchiver {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
}

impl ZipArchiver {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
        }
    }

    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> ArchiveResult<()> {
        if !self.names.insert(name.to_string()) {
            return Err(ArchiveError::DuplicateEntry(name.to_string()));
        }

        // FLAC is already compressed, deflating it again only costs time
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .large_file(data.len() as u64 >= u32::MAX as u64);

        self.writer.start_file(name, options)?;
        self.writer.write_all(data)?;

        debug!("Added {name} ({} bytes) to archive", data.len());
        Ok(())
    }

    pub fn finish(self) -> ArchiveResult<Vec<u8>> {
        Ok(self.writer.finish()?.into_inner())
    }
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn entries_keep_insertion_order_and_content() {
        let mut archiver = ZipArchiver::new();
        archiver.add_entry("01 - One.flac", b"first").unwrap();
        archiver.add_entry("02 - Two.flac", b"second").unwrap();
        let bytes = archiver.finish().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        let mut entry = archive.by_index(1).unwrap();
        assert_eq!(entry.name(), "02 - Two.flac");
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut archiver = ZipArchiver::new();
        archiver.add_entry("a.flac", b"1").unwrap();

        assert!(matches!(
            archiver.add_entry("a.flac", b"2"),
            Err(ArchiveError::DuplicateEntry(_))
        ));
    }
}
