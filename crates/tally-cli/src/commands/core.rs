//! Core command implementations

use std::path::Path;

use anyhow::Result;

use tally_core::store::Ledger;

pub fn cmd_init(db_path: &Path) -> Result<()> {
    if db_path.exists() {
        println!("Ledger already exists at {}", db_path.display());
        return Ok(());
    }

    Ledger::open(db_path)?;
    println!("✅ Initialized empty ledger at {}", db_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_ledger_and_is_repeatable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");

        cmd_init(&path).unwrap();
        assert!(path.exists());

        // A second init leaves the existing file in place
        cmd_init(&path).unwrap();
        let ledger = Ledger::open(&path).unwrap();
        assert!(ledger.transactions().is_empty());
    }
}
