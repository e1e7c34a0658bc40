//! Derivation of translation unit identifiers from selected text.

use lazy_static::lazy_static;
use regex::Regex;

/// Stem used when the selection does not come from a file.
pub const GLOBAL_STEM: &str = "global";

lazy_static! {
    static ref DISALLOWED_CHARS: Regex = Regex::new(r"[^a-z0-9_]").unwrap();
}

/// Lowercases `text`, turns spaces into underscores and strips everything
/// outside `[a-z0-9_]`.
///
/// Repeated underscores are kept and nothing is escaped, so the result may be
/// empty for selections without a single ASCII letter or digit.
pub fn sanitize(text: &str) -> String {
    let folded = text.to_lowercase().replace(' ', "_");
    DISALLOWED_CHARS.replace_all(&folded, "").into_owned()
}

/// Returns the last `/`-separated segment of `path` without its extension.
///
/// A segment without a `.` is returned whole.
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit_once('/').map_or(path, |(_, name)| name);
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// Derives a unit id for `text`.
///
/// A non-empty `prefix` wins over the file stem; without a prefix the stem
/// of `file_path` is used, or [`GLOBAL_STEM`] when there is no path.
///
/// ```rust
/// use xliffgen::identifier::derive_unit_id;
///
/// assert_eq!(derive_unit_id("Hello World!", Some("/a/b/c.twig"), ""), "c.hello_world");
/// assert_eq!(derive_unit_id("Hi", Some("/a/b/c.twig"), "app"), "app.hi");
/// assert_eq!(derive_unit_id("Hi", None, ""), "global.hi");
/// ```
pub fn derive_unit_id(text: &str, file_path: Option<&str>, prefix: &str) -> String {
    let sanitized = sanitize(text);
    if !prefix.is_empty() {
        return format!("{prefix}.{sanitized}");
    }
    let stem = file_path.map_or(GLOBAL_STEM, file_stem);
    format!("{stem}.{sanitized}")
}
