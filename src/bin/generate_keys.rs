// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generate the RSA keypair used to protect stored Clockify API keys.
//!
//! Writes `RSA_PUBLIC_KEY` and `RSA_PRIVATE_KEY` into `.env` as single-line
//! values with literal `\n` sequences, replacing any existing entries.
//!
//! Usage: `cargo run --bin generate_keys`

use std::fs;
use std::path::Path;
use timesheet_relay::services::crypto;

fn main() -> anyhow::Result<()> {
    println!("Generating RSA-{} keypair...", crypto::RSA_KEY_BITS);
    let (public_pem, private_pem) = crypto::generate_keypair()?;

    let env_path = Path::new(".env");
    let existing = if env_path.exists() {
        fs::read_to_string(env_path)?
    } else {
        String::new()
    };

    // Keep everything except previous key entries
    let mut lines: Vec<String> = existing
        .lines()
        .filter(|line| {
            !line.starts_with("RSA_PUBLIC_KEY=") && !line.starts_with("RSA_PRIVATE_KEY=")
        })
        .map(str::to_string)
        .collect();

    lines.push(String::new());
    lines.push("# RSA keys for API key encryption".to_string());
    lines.push(format!(
        "RSA_PUBLIC_KEY=\"{}\"",
        public_pem.replace('\n', "\\n")
    ));
    lines.push(format!(
        "RSA_PRIVATE_KEY=\"{}\"",
        private_pem.replace('\n', "\\n")
    ));
    lines.push(String::new());

    fs::write(env_path, lines.join("\n"))?;

    println!("Keys written to .env");
    println!("  - RSA_PUBLIC_KEY  (encrypt side)");
    println!("  - RSA_PRIVATE_KEY (decrypt side, keep out of version control)");
    Ok(())
}
