use crate::engine::{CapabilityProvider, Renderer};
use tracing::{debug, info};

/// Resolve the rendering capability, installing it at most once.
///
/// Returns `None` when it is still unavailable afterwards. Install and
/// resolution errors are reported on the console and never propagated.
pub fn ensure_capability<P: CapabilityProvider>(
    provider: &P,
    allow_install: bool,
) -> Option<P::Renderer> {
    let name = provider.name();

    match provider.resolve() {
        Ok(renderer) => {
            info!("{name} resolved: {}", renderer.describe());
            println!("✓ {name} is available");
            return Some(renderer);
        }
        Err(err) => debug!("{name} not resolvable: {err:#}"),
    }

    if !allow_install {
        debug!("{name} missing and installation is disabled");
        println!("❌ {name} is not available and installation is disabled");
        return None;
    }

    println!("Installing {name}...");
    if let Err(err) = provider.install() {
        debug!("{name} install failed: {err:#}");
        println!("❌ Failed to install {name}: {err:#}");
        return None;
    }

    match provider.resolve() {
        Ok(renderer) => {
            println!("✓ {name} installed successfully");
            Some(renderer)
        }
        Err(err) => {
            debug!("{name} still unavailable after install: {err:#}");
            println!("❌ Failed to install {name}: {err:#}");
            None
        }
    }
}
