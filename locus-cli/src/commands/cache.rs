//! Cache management CLI commands.

use std::path::Path;

use clap::Subcommand;
use locus::cache::CacheStore;
use tracing::info;

use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Remove every cached provider result
    Clear,
    /// Show entry count and size
    Stats,
}

/// Run a cache subcommand.
pub fn run(cache_dir: &Path, action: CacheAction) -> Result<(), CliError> {
    let store = CacheStore::new(cache_dir);

    match action {
        CacheAction::Clear => {
            println!("Clearing cache at: {}", cache_dir.display());
            let removed = store.clear().map_err(CliError::CacheClear)?;
            info!(cache = %cache_dir.display(), removed, "Cache cleared");
            println!("Deleted {} entries", removed);
        }
        CacheAction::Stats => {
            println!("Cache: {}", cache_dir.display());
            let stats = store.stats().map_err(CliError::CacheStats)?;
            println!("  Entries: {}", stats.entries);
            println!("  Size:    {}", format_size(stats.bytes));
        }
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_stats_and_clear_on_empty_dir() {
        let temp = TempDir::new().unwrap();
        assert!(run(temp.path(), CacheAction::Stats).is_ok());
        assert!(run(temp.path(), CacheAction::Clear).is_ok());
    }
}
