use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Defines the interface for reading structural record documents.
///
/// Parsing from text is total: implementors must accept arbitrary input and
/// report malformed content on the returned document rather than as an error.
/// Only the I/O needed to get the text into memory can fail.
pub trait StructureFile {
    /// The parsed representation of one document.
    type Document;

    /// Parses a document that is already in memory.
    ///
    /// # Arguments
    ///
    /// * `text` - The full document text.
    fn parse_str(&self, text: &str) -> Self::Document;

    /// Reads a document from a reader, replacing invalid UTF-8 sequences.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from `reader` fails.
    fn read_from(&self, reader: &mut impl Read) -> io::Result<Self::Document> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(self.parse_str(&String::from_utf8_lossy(&bytes)))
    }

    /// Reads a document from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::Document> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }
}
