use xliffgen::traits::Parser;
use xliffgen::{TranslationUnit, XliffDocument};

fn truncate(value: &str, full: bool) -> String {
    if full || value.chars().count() <= 50 {
        value.to_string()
    } else {
        let head: String = value.chars().take(50).collect();
        format!("{}...", head)
    }
}

/// Read the units of an XLIFF file.
pub fn read_units(xliff: &str) -> Result<Vec<TranslationUnit>, String> {
    let document = XliffDocument::read_from(xliff)
        .map_err(|e| format!("Error reading {}: {}", xliff, e))?;
    document.units().map_err(|e| e.to_string())
}

/// Print the units of an XLIFF file, as text or as JSON.
pub fn run_list_command(xliff: String, json: bool, full: bool) -> Result<(), String> {
    let units = read_units(&xliff)?;

    if json {
        let rendered = serde_json::to_string_pretty(&units)
            .map_err(|e| format!("Error serializing to JSON: {}", e))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Units: {}", units.len());
    for (i, unit) in units.iter().enumerate() {
        println!("\n  Unit {}: {}", i + 1, unit.id);
        if let Some(source) = &unit.source {
            println!("    Source: {}", truncate(source, full));
        }
        match &unit.target {
            Some(target) => println!("    Target: {}", truncate(target, full)),
            None => println!("    Target: <missing>"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        let long = "é".repeat(60);
        let short = truncate(&long, false);
        assert_eq!(short.chars().count(), 53);
        assert!(short.ends_with("..."));
        assert_eq!(truncate(&long, true), long);
        assert_eq!(truncate("short", false), "short");
    }
}
