use xliffgen::{LogNotifier, SyncOutcome, sync_unit};

/// Insert or update one unit in an XLIFF file.
pub fn run_sync_command(xliff: String, id: String, text: String) -> Result<(), String> {
    if text.is_empty() {
        return Err("Text cannot be empty".to_string());
    }

    let outcome = sync_unit(&xliff, &id, &text, &LogNotifier).map_err(|e| e.to_string())?;
    match outcome {
        SyncOutcome::Inserted => println!("✅ Added '{}' to {}", id, xliff),
        SyncOutcome::Updated => println!("✅ Updated '{}' in {}", id, xliff),
        SyncOutcome::Unchanged => println!("ℹ️  '{}' already up to date in {}", id, xliff),
    }
    Ok(())
}
