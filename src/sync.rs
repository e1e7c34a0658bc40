//! Insert-or-update of a single translation unit in an XLIFF file on disk.

use std::{fs, path::Path};

use tracing::info;

use crate::{
    error::Error,
    notify::ChangeNotifier,
    traits::Parser,
    xliff::{SyncOutcome, XliffDocument},
};

/// Extension required for translation files, compared case-insensitively.
pub const XLIFF_EXTENSION: &str = "xlf";

/// Checks that `path` names an `.xlf` file. Existence is not checked.
///
/// The extension is whatever follows the last `.` of the file name, so a file
/// called just `.xlf` qualifies.
pub fn ensure_xliff_path(path: &Path) -> Result<(), Error> {
    let is_xliff = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(XLIFF_EXTENSION));
    if is_xliff {
        Ok(())
    } else {
        Err(Error::InvalidFileType(path.to_path_buf()))
    }
}

/// Writes unit `id` with target `text` into the XLIFF file at `path`.
///
/// The file is read once and, only when every check passes, written once;
/// `notifier` is called after the write. Failures leave the file untouched:
///
/// - [`Error::InvalidFileType`] if the extension is not `xlf`,
/// - [`Error::NotFound`] if there is no file at `path`,
/// - [`Error::Parse`] if the content is not well-formed XML,
/// - [`Error::MissingBody`] if there is no `<body>` element,
/// - [`Error::MalformedUnit`] if the matching unit has no `<target>`.
pub fn sync_unit<P: AsRef<Path>>(
    path: P,
    id: &str,
    text: &str,
    notifier: &dyn ChangeNotifier,
) -> Result<SyncOutcome, Error> {
    let path = path.as_ref();
    ensure_xliff_path(path)?;
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let content = fs::read(path)?;
    let mut document = XliffDocument::from_bytes(&content)?;
    let outcome = document.upsert_unit(id, text)?;

    document.write_to(path)?;
    info!(path = %path.display(), id, ?outcome, "translation unit saved");

    notifier.file_changed(path);
    Ok(outcome)
}
