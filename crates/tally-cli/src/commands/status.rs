//! Ledger status command implementation

use std::fs;
use std::path::Path;

use anyhow::Result;

use tally_core::store::Ledger;

pub fn cmd_status(db_path: &Path) -> Result<()> {
    println!();
    println!("📊 Tally Status");
    println!("   ─────────────────────────────────────");
    println!("   Ledger: {}", db_path.display());

    if !db_path.exists() {
        println!("   (ledger not initialized - run `tally init`)");
        return Ok(());
    }

    if let Ok(metadata) = fs::metadata(db_path) {
        let size_kb = metadata.len() as f64 / 1024.0;
        if size_kb < 1024.0 {
            println!("   Size: {:.1} KB", size_kb);
        } else {
            println!("   Size: {:.1} MB", size_kb / 1024.0);
        }
    }

    let ledger = Ledger::open(db_path)?;
    let transactions = ledger.transactions();
    let recurring = transactions.iter().filter(|t| t.recurring).count();

    println!();
    println!("   Imports: {}", ledger.imports().len());
    println!("   Transactions: {}", transactions.len());
    println!("   Recurring: {}", recurring);

    Ok(())
}
