//! # ScanPOS Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          scanpos (binary)                               │
//! │                                                                         │
//! │  main.rs ────► tokio runtime, hands over to scanpos_cli::run()          │
//! │                                                                         │
//! │  lib.rs ─────► logging, config, database, command dispatch              │
//! │                                                                         │
//! │  stdout: tables, receipts, session prompts                              │
//! │  stderr: logs and the final "error: ..." line                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    scanpos_cli::run().await
}
