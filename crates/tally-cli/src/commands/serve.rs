//! Server command implementation

use std::path::Path;

use anyhow::Result;

use tally_core::store::Ledger;
use tally_server::ServerConfig;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    mut cors_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Ledger: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    // Merge origins from the environment (comma-separated)
    if let Ok(env_origins) = std::env::var("TALLY_CORS_ORIGINS") {
        cors_origins.extend(
            env_origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );
    }
    if !cors_origins.is_empty() {
        println!("   CORS origins: {}", cors_origins.join(", "));
    }

    if std::env::var("OPENAI_API_KEY").is_err() {
        println!("   ⚠️  OPENAI_API_KEY not set - uploads will fail until configured");
    }

    let ledger = Ledger::open(db_path)?;
    let config = ServerConfig {
        allowed_origins: cors_origins,
    };

    tally_server::serve(ledger, host, port, config).await
}
