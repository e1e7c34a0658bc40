use crate::config::load_settings;
use crate::validation::{validate_file_path, validate_selection_range};
use std::fs;
use std::path::{Path, PathBuf};
use xliffgen::{ChangeNotifier, LogNotifier, Selection, SyncOutcome};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Source file holding the selection.
    pub file: String,
    pub start: usize,
    pub end: usize,
    pub project_root: Option<String>,
    pub config: Option<String>,
    pub dry_run: bool,
}

fn project_root(opts: &GenerateOptions) -> PathBuf {
    opts.project_root
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn host_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Replace the selected byte range of a source file with a translation call
/// and save the selected text as a translation unit.
pub fn run_generate_command(opts: GenerateOptions) -> Result<(), String> {
    validate_file_path(&opts.file)?;
    let source = fs::read_to_string(&opts.file)
        .map_err(|e| format!("Failed to read {}: {}", opts.file, e))?;
    let range = validate_selection_range(&source, opts.start, opts.end)?;

    let root = project_root(&opts);
    let settings = load_settings(&root, &opts.config)?;
    let selection = Selection {
        text: source[range.clone()].to_string(),
        range,
        file_path: Some(host_path(Path::new(&opts.file))),
    };
    tracing::debug!(file = %opts.file, selection = %selection.text, "selection read");

    if opts.dry_run {
        let (unit_id, call) =
            xliffgen::translation_call(&selection, &settings).map_err(|e| e.to_string())?;
        println!("🔎 Unit '{}' -> {}", unit_id, call);
        println!(
            "ℹ️  Dry run: {} and {} left untouched",
            opts.file,
            settings.translation_file(&root).display()
        );
        return Ok(());
    }

    let replacement = xliffgen::generate(&selection, &settings, &root, &LogNotifier)
        .map_err(|e| e.to_string())?;

    let mut buffer = source;
    replacement.apply_to(&mut buffer);
    fs::write(&opts.file, buffer).map_err(|e| format!("Failed to write {}: {}", opts.file, e))?;
    LogNotifier.file_changed(Path::new(&opts.file));

    match replacement.outcome {
        SyncOutcome::Inserted => println!("✅ Added unit '{}'", replacement.unit_id),
        SyncOutcome::Updated => println!("✅ Updated unit '{}'", replacement.unit_id),
        SyncOutcome::Unchanged => println!("ℹ️  Unit '{}' already up to date", replacement.unit_id),
    }
    println!("📄 Replaced selection in {} with {}", opts.file, replacement.text);
    Ok(())
}
