use std::ops::Range;
use std::path::Path;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate that `start..end` is a non-empty byte range of `content` that
/// starts and ends on character boundaries.
pub fn validate_selection_range(
    content: &str,
    start: usize,
    end: usize,
) -> Result<Range<usize>, String> {
    if start >= end {
        return Err(format!(
            "Empty or reversed selection: start {} must be before end {}",
            start, end
        ));
    }

    if end > content.len() {
        return Err(format!(
            "Selection end {} is past the end of the file ({} bytes)",
            end,
            content.len()
        ));
    }

    if !content.is_char_boundary(start) || !content.is_char_boundary(end) {
        return Err(format!(
            "Selection {}..{} does not fall on character boundaries",
            start, end
        ));
    }

    Ok(start..end)
}
