use std::path::PathBuf;
use thiserror::Error;

/// Why a run did not produce a PDF.
///
/// Every variant is handled where it occurs and surfaces as a printed
/// diagnostic plus a `false`/`None` result; none of them reach `main`.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("{name} is unavailable: {reason}")]
    CapabilityUnavailable { name: String, reason: String },

    #[error("HTML file not found: {}", .path.display())]
    InputMissing { path: PathBuf },

    #[error("URL inputs are disabled: {input}")]
    UrlInput { input: String },

    #[error("Error converting to PDF: {message}")]
    RenderFailure { message: String },
}

impl Failure {
    pub fn render(message: impl Into<String>) -> Self {
        Failure::RenderFailure {
            message: message.into(),
        }
    }
}
