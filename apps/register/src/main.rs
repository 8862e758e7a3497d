//! # Bazaar Register Entry Point
//!
//! Loads the register and prints the current price board.
//!
//! ## Usage
//! ```text
//! bazaar-register [path/to/register.toml]
//! ```
//!
//! The config path can also come from `BAZAAR_CONFIG_PATH`; see
//! `state::config` for every override.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    match bazaar_register::run(config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bazaar-register: {}", e);
            ExitCode::FAILURE
        }
    }
}
