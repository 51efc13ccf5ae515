pub mod check;
pub mod edit;
pub mod init;
pub mod preview;

pub use check::{check, CheckArgs};
pub use edit::{edit, EditArgs};
pub use init::{init, InitArgs};
pub use preview::{preview, PreviewArgs};

use anyhow::{anyhow, Result};
use autoletter_parser::{format_error, parse, Fragment};
use std::fs;
use std::path::Path;

/// Read a saved body and parse it, with a source-annotated report on failure
pub(crate) fn read_body(path: &Path) -> Result<(String, Fragment)> {
    let source = fs::read_to_string(path).map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;

    let fragment = parse(&source).map_err(|e| {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        anyhow!("\n{}", format_error(&source, file_name, &e))
    })?;

    Ok((source, fragment))
}

/// Write to a file, or stdout when no path is given
pub(crate) fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        None => println!("{}", content),
    }
    Ok(())
}
