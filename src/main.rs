//! appnera - turn websites into desktop applications.
//!
//! This binary creates, lists and removes app wrappers with proper error
//! handling and rollback of half-built apps.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match appnera::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
