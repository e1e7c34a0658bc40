//! The generate action: turn an editor selection into a translation call and
//! a translation unit.

use std::{ops::Range, path::Path};

use tracing::debug;

use crate::{
    error::Error,
    identifier::derive_unit_id,
    notify::ChangeNotifier,
    settings::Settings,
    sync::sync_unit,
    template::{SourceKind, apply},
    xliff::SyncOutcome,
};

/// Text selected in the host editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub text: String,
    /// Byte range of the selection in the edited buffer.
    pub range: Range<usize>,
    /// Path of the edited file, `/`-separated, if the buffer has one.
    pub file_path: Option<String>,
}

/// The edit the host has to apply once the unit has been saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub range: Range<usize>,
    pub text: String,
    pub unit_id: String,
    pub outcome: SyncOutcome,
}

/// A buffer the host can splice a replacement into.
pub trait TextBuffer {
    fn replace_range(&mut self, range: Range<usize>, text: &str);
}

impl TextBuffer for String {
    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        String::replace_range(self, range, text);
    }
}

impl Replacement {
    pub fn apply_to<B: TextBuffer + ?Sized>(&self, buffer: &mut B) {
        buffer.replace_range(self.range.clone(), &self.text);
    }
}

/// Derives the unit id for `selection` and formats the call for its file
/// type. Returns `(unit_id, call)`; nothing is written.
pub fn translation_call(
    selection: &Selection,
    settings: &Settings,
) -> Result<(String, String), Error> {
    if selection.text.is_empty() {
        return Err(Error::EmptySelection);
    }

    let file_path = selection.file_path.as_deref();
    let kind = SourceKind::from_path(file_path);
    let unit_id = derive_unit_id(&selection.text, file_path, &settings.unit_id_prefix);
    let text = apply(kind.template(settings), &unit_id);
    debug!(?kind, unit_id = %unit_id, call = %text, "generated translation call");
    Ok((unit_id, text))
}

/// Derives the unit id for `selection`, saves the unit into the translation
/// file configured in `settings` and returns the call that replaces the
/// selection.
///
/// Nothing is returned for the host to apply unless the unit was saved.
pub fn generate(
    selection: &Selection,
    settings: &Settings,
    project_root: &Path,
    notifier: &dyn ChangeNotifier,
) -> Result<Replacement, Error> {
    let (unit_id, text) = translation_call(selection, settings)?;

    let translation_file = settings.translation_file(project_root);
    let outcome = sync_unit(&translation_file, &unit_id, &selection.text, notifier)?;

    Ok(Replacement {
        range: selection.range.clone(),
        text,
        unit_id,
        outcome,
    })
}
