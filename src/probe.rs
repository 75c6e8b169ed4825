use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputProbe {
    pub path: String,
    pub file_bytes: u64,
}

/// Checks that `output` exists, is non-empty and starts with `%PDF-`.
pub fn probe_output(output: &Path) -> Result<OutputProbe> {
    let meta = std::fs::metadata(output)
        .with_context(|| format!("renderer produced no file at {}", output.display()))?;
    if meta.len() == 0 {
        bail!("renderer produced an empty file: {}", output.display());
    }

    let mut head = Vec::with_capacity(PDF_SIGNATURE.len());
    File::open(output)
        .with_context(|| "open output")?
        .take(PDF_SIGNATURE.len() as u64)
        .read_to_end(&mut head)
        .with_context(|| "read output header")?;
    if head != PDF_SIGNATURE {
        bail!(
            "output does not start with the PDF signature: {:?}",
            String::from_utf8_lossy(&head)
        );
    }

    Ok(OutputProbe {
        path: output.display().to_string(),
        file_bytes: meta.len(),
    })
}
