use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result};
use log::{debug, info};

/// Reads the whole text from `path`, or from stdin when no path is given.
/// Invalid UTF-8 is replaced rather than rejected.
pub(super) fn read_text(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            debug!("input: reading stdin");
            let mut bytes = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            bytes
        }
    };

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            info!("input: invalid utf-8, replacing bad sequences");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };
    debug!("input: read bytes={}", text.len());
    Ok(text)
}
