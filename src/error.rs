//! All error types for the xliffgen crate.
//!
//! Every failure is scoped to a single operation: when one of these is
//! returned, nothing has been written to disk.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XLIFF file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid file type: {}. Please select an XLIFF (.xlf) file", .0.display())]
    InvalidFileType(PathBuf),

    #[error("failed to parse XLIFF file: {0}")]
    Parse(String),

    #[error("invalid XLIFF file: no <body> tag found")]
    MissingBody,

    #[error("malformed translation unit `{0}`: no <target> element")]
    MalformedUnit(String),

    #[error("nothing selected")]
    EmptySelection,

    #[error("invalid settings file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(value: quick_xml::Error) -> Self {
        Error::Parse(value.to_string())
    }
}

impl Error {
    /// Creates a parse error from any displayable message.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }
}
