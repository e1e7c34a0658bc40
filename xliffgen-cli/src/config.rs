use std::path::{Path, PathBuf};
use xliffgen::Settings;

/// Load settings from an explicit file, or from the project root.
pub fn load_settings(project_root: &Path, config: &Option<String>) -> Result<Settings, String> {
    match config {
        Some(path) => Settings::read_from(path)
            .map_err(|e| format!("Failed to read settings from {}: {}", path, e)),
        None => Settings::load(project_root).map_err(|e| format!("Failed to load settings: {}", e)),
    }
}

fn settings_path(project_root: &Path, config: &Option<String>) -> PathBuf {
    config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| Settings::default_path(project_root))
}

/// Print the effective settings as TOML.
pub fn run_config_show_command(project_root: &Path, config: &Option<String>) -> Result<(), String> {
    let settings = load_settings(project_root, config)?;
    let rendered = settings
        .to_toml_string()
        .map_err(|e| format!("Failed to render settings: {}", e))?;
    print!("{}", rendered);
    Ok(())
}

/// Write a settings file with the default values.
pub fn run_config_init_command(
    project_root: &Path,
    config: &Option<String>,
    force: bool,
) -> Result<(), String> {
    let path = settings_path(project_root, config);
    if path.exists() && !force {
        return Err(format!(
            "Settings file already exists: {} (use --force to overwrite)",
            path.display()
        ));
    }
    Settings::default()
        .write_to(&path)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    println!("✅ Wrote default settings to {}", path.display());
    Ok(())
}
