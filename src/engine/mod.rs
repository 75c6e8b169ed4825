pub mod process;
pub mod types;
pub mod weasyprint;

use anyhow::Result;
use std::path::Path;

pub use types::{Availability, CapabilityDiag};

/// A resolved HTML to PDF rendering capability.
pub trait Renderer {
    /// Short human-readable identity, e.g. the reported version string.
    fn describe(&self) -> String;
    /// Render `input` and write the PDF to `output`, overwriting it.
    fn render(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Knows how to find, and if needed obtain, a [`Renderer`].
pub trait CapabilityProvider {
    type Renderer: Renderer;

    fn name(&self) -> &str;
    fn resolve(&self) -> Result<Self::Renderer>;
    fn can_install(&self) -> bool;
    fn install(&self) -> Result<()>;

    fn availability(&self) -> Availability {
        match self.resolve() {
            Ok(r) => Availability::AlreadyAvailable {
                renderer: r.describe(),
            },
            Err(err) if self.can_install() => Availability::Installable {
                reason: format!("{err:#}"),
            },
            Err(err) => Availability::Unavailable {
                reason: format!("{err:#}"),
            },
        }
    }
}
