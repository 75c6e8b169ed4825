use crate::{
    config::Config,
    engine::Renderer,
    error::Failure,
    probe::{OutputProbe, probe_output},
    util::ensure_dir,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runs one HTML to PDF conversion through a resolved [`Renderer`].
#[derive(Debug, Clone)]
pub struct Converter {
    pub create_parent_dirs: bool,
    pub remove_partial_on_failure: bool,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Converter {
    pub fn new(cfg: &Config) -> Self {
        Self {
            create_parent_dirs: cfg.output.create_parent_dirs,
            remove_partial_on_failure: cfg.output.remove_partial_on_failure,
        }
    }

    /// Convert `input` into a PDF at `output`, overwriting it.
    ///
    /// Every failure is printed and collapsed into `false`.
    pub fn convert<R: Renderer + ?Sized>(&self, renderer: &R, input: &Path, output: &Path) -> bool {
        match self.try_convert(renderer, input, output) {
            Ok(probe) => {
                info!("wrote {} ({} bytes)", probe.path, probe.file_bytes);
                println!("✓ PDF created successfully: {}", output.display());
                true
            }
            Err(failure) => {
                debug!(?failure, "conversion failed");
                println!("❌ {failure}");
                false
            }
        }
    }

    /// A previous PDF at `output` is set aside while the renderer runs, so
    /// only a file written by this run can pass the output check. It is put
    /// back when the run fails.
    pub fn try_convert<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
        input: &Path,
        output: &Path,
    ) -> Result<OutputProbe, Failure> {
        let is_file = std::fs::metadata(input)
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(Failure::InputMissing {
                path: input.to_path_buf(),
            });
        }

        println!("Converting {} to PDF...", input.display());

        if self.create_parent_dirs {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent).map_err(|e| Failure::render(format!("{e:#}")))?;
            }
        }

        let previous = set_aside(output)?;
        let written = renderer
            .render(input, output)
            .and_then(|()| probe_output(output));

        match written {
            Ok(probe) => {
                if let Some(prev) = &previous {
                    if let Err(err) = std::fs::remove_file(prev) {
                        debug!("could not drop previous output {}: {err}", prev.display());
                    }
                }
                Ok(probe)
            }
            Err(err) => {
                self.restore_after_failure(output, previous);
                Err(Failure::render(format!("{err:#}")))
            }
        }
    }

    fn restore_after_failure(&self, output: &Path, previous: Option<PathBuf>) {
        let partial = output.exists();
        if partial && self.remove_partial_on_failure {
            debug!("removing partial output {}", output.display());
            if let Err(err) = std::fs::remove_file(output) {
                info!("could not remove partial output {}: {err}", output.display());
            }
        }

        let Some(prev) = previous else { return };
        if output.exists() {
            // partial output was kept on request; it wins over the old PDF
            let _ = std::fs::remove_file(&prev);
            return;
        }
        if let Err(err) = std::fs::rename(&prev, output) {
            info!(
                "could not restore previous output {} from {}: {err}",
                output.display(),
                prev.display()
            );
        }
    }
}

/// Moves an existing `output` to a hidden sibling and returns its path.
fn set_aside(output: &Path) -> Result<Option<PathBuf>, Failure> {
    if !output.exists() {
        return Ok(None);
    }
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.pdf".into());
    let aside = output.with_file_name(format!(".{name}.htmlpress-prev"));
    std::fs::rename(output, &aside).map_err(|e| {
        Failure::render(format!(
            "cannot move existing {} aside: {e}",
            output.display()
        ))
    })?;
    debug!("previous output moved to {}", aside.display());
    Ok(Some(aside))
}
