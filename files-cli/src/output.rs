//! Output helpers: json to stdout or a file, raw bytes for content downloads.

use std::{
    io::Write,
    path::Path,
};

use anyhow::{Context, Result};
use serde::Serialize;

pub struct Output {
    pretty: bool,
    quiet: bool,
}

impl Output {
    pub fn new(pretty: bool, quiet: bool) -> Self {
        Self { pretty, quiet }
    }

    /// Serializes the value as json and prints it, honoring --pretty/--quiet.
    pub fn emit_json<T: Serialize>(&self, value: &T) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{text}");
        Ok(())
    }

    /// Writes raw bytes to the given file, or stdout when no file is given.
    /// Content may be binary, so stdout gets the bytes unmodified.
    pub fn emit_bytes(&self, bytes: &[u8], output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => std::fs::write(path, bytes)
                .with_context(|| format!("writing {}", path.display()))?,
            None => {
                if self.quiet {
                    return Ok(());
                }
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(bytes).context("writing stdout")?;
                stdout.flush().context("flushing stdout")?;
            }
        }
        Ok(())
    }
}
