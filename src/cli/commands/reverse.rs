//! Reverse command implementation.

use crate::reverse::reverse_text;
use anyhow::Result;

/// Run the reverse command.
pub fn run_reverse(text: &str) -> Result<()> {
    println!("{}", reverse_text(text));
    Ok(())
}
