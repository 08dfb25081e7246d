//! # clm-cli: Command-Line Tools for the Contract Lifecycle Manager
//!
//! Provides the `clm` binary. Everything runs offline against the pure
//! lifecycle rules in `clm-state`; no server or database is needed.
//!
//! ## Subcommands
//!
//! - `clm lifecycle`: Print the status table or one status's view.
//! - `clm check`: Evaluate a transition and the required-field gate
//!   against an exported blueprint and its contract values.
//!
//! ```bash
//! clm lifecycle --status sent
//! clm check --blueprint bp.json --values values.json --status created --target approved
//! ```
//!
//! Handlers return the process exit code: 0 on success, 1 when a check
//! is rejected. I/O and parse failures surface as errors.

pub mod check;
pub mod lifecycle;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read and parse a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}
