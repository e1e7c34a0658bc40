//! Whole-file reading and writing for translation documents.

use std::{fs, io::Write, path::Path, str};

use crate::error::Error;

/// A document that is always read and written as a complete UTF-8 file.
///
/// Implementors provide [`Parser::from_str`] and [`Parser::to_writer`]; the
/// byte and file variants are derived from those two.
///
/// # Example
///
/// ```rust,no_run
/// use xliffgen::{traits::Parser, xliff::XliffDocument};
/// let mut document = XliffDocument::read_from("translations/messages.en.xlf")?;
/// document.upsert_unit("home.title", "Welcome")?;
/// document.write_to("translations/messages.en.xlf")?;
/// Ok::<(), xliffgen::Error>(())
/// ```
pub trait Parser: Sized {
    /// Parses a complete document.
    fn from_str(s: &str) -> Result<Self, Error>;

    /// Serializes the document.
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Parses raw file content. Invalid UTF-8 is a parse error.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let content = str::from_utf8(bytes)
            .map_err(|e| Error::parse_error(format!("file is not valid UTF-8: {}", e)))?;
        Self::from_str(content)
    }

    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_bytes(&fs::read(path)?)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        Ok(out)
    }

    /// Replaces the file at `path`. The document is fully rendered before the
    /// file is opened, so a serialization error leaves the file as it was.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}
