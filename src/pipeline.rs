use crate::{
    config::Config,
    convert::Converter,
    engine::{CapabilityProvider, Renderer},
    error::Failure,
    ensure::ensure_capability,
    probe::probe_output,
    report::{Outcome, RunReport},
    util::{file_name, hash_file, looks_like_url, now_rfc3339},
};
use std::path::Path;
use tracing::{debug, info};

/// Ensure the capability, then convert one document.
pub struct Pipeline<P: CapabilityProvider> {
    cfg: Config,
    provider: P,
    converter: Converter,
}

impl<P: CapabilityProvider> Pipeline<P> {
    pub fn new(cfg: &Config, provider: P) -> Self {
        Self {
            cfg: cfg.clone(),
            converter: Converter::new(cfg),
            provider,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn run(&self, input: &Path, output: &Path) -> RunReport {
        let started = now_rfc3339();
        println!("🚀 {}", self.cfg.global.title);
        println!("{}", "=".repeat(50));

        let (status, renderer) = self.run_inner(input, output);
        info!("run finished status={status:?}");

        match status {
            Outcome::Converted => {
                println!();
                println!("✅ PDF generation completed successfully!");
                println!("📄 Your PDF is ready at: {}", file_name(output));
            }
            Outcome::CapabilityUnavailable => {
                println!();
                self.print_fallback(input);
            }
            Outcome::ConversionFailed => {
                println!();
                println!("❌ PDF generation failed");
                self.print_fallback(input);
            }
        }

        let (output_bytes, output_sha256) = if status.is_success() {
            summarize_output(output)
        } else {
            (None, None)
        };

        RunReport {
            status,
            input: input.display().to_string(),
            output: output.display().to_string(),
            renderer,
            output_bytes,
            output_sha256,
            started,
            finished: now_rfc3339(),
        }
    }

    fn run_inner(&self, input: &Path, output: &Path) -> (Outcome, Option<String>) {
        // checked before the ensure step so a doomed request never installs
        let input_str = input.display().to_string();
        if self.cfg.security.reject_url_inputs && looks_like_url(&input_str) {
            let failure = Failure::UrlInput { input: input_str };
            debug!(?failure, "input rejected");
            println!("❌ {failure}");
            return (Outcome::ConversionFailed, None);
        }

        let Some(renderer) = ensure_capability(&self.provider, self.provider.can_install()) else {
            let failure = Failure::CapabilityUnavailable {
                name: self.provider.name().to_string(),
                reason: "not resolvable after at most one install attempt".into(),
            };
            info!("{failure}");
            return (Outcome::CapabilityUnavailable, None);
        };
        let described = Some(renderer.describe());

        if self.converter.convert(&renderer, input, output) {
            (Outcome::Converted, described)
        } else {
            (Outcome::ConversionFailed, described)
        }
    }

    fn print_fallback(&self, input: &Path) {
        println!(
            "💡 Alternative: You can open {} in your browser and print to PDF manually",
            file_name(input)
        );
    }
}

fn summarize_output(output: &Path) -> (Option<u64>, Option<String>) {
    let bytes = probe_output(output).ok().map(|p| p.file_bytes);
    let sha = match hash_file(output) {
        Ok(h) => Some(h),
        Err(err) => {
            info!("hashing output failed: {err:#}");
            None
        }
    };
    (bytes, sha)
}
