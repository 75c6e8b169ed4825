use super::{CapabilityDiag, CapabilityProvider, Renderer, process};
use crate::{config::Config, util::expand_tilde};
use anyhow::{Result, anyhow, bail};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info};

/// Finds WeasyPrint on this machine and installs it through pip when asked.
pub struct WeasyPrintProvider {
    cfg: Config,
    python_exe: PathBuf,
}

/// How a WeasyPrint CLI is launched: a program plus leading arguments.
#[derive(Debug, Clone)]
struct Invocation {
    program: PathBuf,
    prefix: Vec<String>,
}

impl Invocation {
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix);
        cmd
    }

    fn display(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.prefix.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl WeasyPrintProvider {
    pub fn new(cfg: &Config) -> Self {
        Self {
            cfg: cfg.clone(),
            python_exe: resolve_python_exe(&cfg.renderer.python_exe),
        }
    }

    fn candidates(&self) -> Vec<Invocation> {
        let raw = self.cfg.renderer.program.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
            return vec![
                Invocation {
                    program: PathBuf::from("weasyprint"),
                    prefix: Vec::new(),
                },
                Invocation {
                    program: self.python_exe.clone(),
                    prefix: vec!["-m".into(), "weasyprint".into()],
                },
            ];
        }
        vec![Invocation {
            program: expand_tilde(raw),
            prefix: Vec::new(),
        }]
    }

    pub fn install_command(&self) -> Vec<String> {
        let mut argv = vec![
            self.python_exe.display().to_string(),
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
        ];
        argv.extend(self.cfg.install.pip_args.iter().cloned());
        argv.push(self.cfg.install.package.clone());
        argv
    }

    pub fn diagnose(&self) -> CapabilityDiag {
        CapabilityDiag {
            provider: self.name().to_string(),
            python_exe: self.python_exe.display().to_string(),
            install_enabled: self.can_install(),
            install_command: self.install_command(),
            availability: self.availability(),
        }
    }

    fn probe(&self, inv: &Invocation) -> Result<String> {
        let mut cmd = inv.command();
        cmd.arg("--version");
        for (k, v) in &self.cfg.renderer.env {
            cmd.env(k, v);
        }
        let output = process::run(
            cmd,
            process::timeout_from_secs(self.cfg.renderer.probe_timeout_seconds),
        )?;
        if !output.status.success() {
            bail!(
                "`{} --version` exited with {}: {}",
                inv.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            Ok(String::from_utf8_lossy(&output.stderr).trim().to_string())
        } else {
            Ok(stdout)
        }
    }
}

impl CapabilityProvider for WeasyPrintProvider {
    type Renderer = WeasyPrintRenderer;

    fn name(&self) -> &str {
        "WeasyPrint"
    }

    fn resolve(&self) -> Result<WeasyPrintRenderer> {
        let mut errors = Vec::new();
        for inv in self.candidates() {
            match self.probe(&inv) {
                Ok(version) => {
                    debug!("resolved {} -> {}", inv.display(), version);
                    return Ok(WeasyPrintRenderer {
                        invocation: inv,
                        version,
                        extra_args: self.cfg.renderer.extra_args.clone(),
                        env: self.cfg.renderer.env.clone(),
                        timeout: process::timeout_from_secs(
                            self.cfg.renderer.render_timeout_seconds,
                        ),
                        log_stderr: self.cfg.debug.log_renderer_stderr,
                    });
                }
                Err(err) => {
                    debug!("candidate {} rejected: {err:#}", inv.display());
                    errors.push(format!("{}: {err:#}", inv.display()));
                }
            }
        }
        Err(anyhow!(
            "no usable weasyprint found ({})",
            errors.join("; ")
        ))
    }

    fn can_install(&self) -> bool {
        self.cfg.install.enabled
    }

    fn install(&self) -> Result<()> {
        if !self.can_install() {
            bail!("installation is disabled");
        }
        let argv = self.install_command();
        info!("install: {}", argv.join(" "));

        let mut cmd = Command::new(&self.python_exe);
        cmd.args(&argv[1..]);
        let output = process::run(
            cmd,
            process::timeout_from_secs(self.cfg.install.timeout_seconds),
        )?;
        if !output.status.success() {
            bail!(
                "`{}` exited with {}: {}",
                argv.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

pub struct WeasyPrintRenderer {
    invocation: Invocation,
    version: String,
    extra_args: Vec<String>,
    env: std::collections::BTreeMap<String, String>,
    timeout: Option<Duration>,
    log_stderr: bool,
}

impl Renderer for WeasyPrintRenderer {
    fn describe(&self) -> String {
        self.version.clone()
    }

    fn render(&self, input: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.invocation.command();
        cmd.args(&self.extra_args);
        cmd.arg(input);
        cmd.arg(output);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }

        let out = process::run(cmd, self.timeout)?;
        let stderr = String::from_utf8_lossy(&out.stderr);
        if !out.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.invocation.display(),
                out.status,
                stderr.trim()
            );
        }
        if self.log_stderr && !stderr.trim().is_empty() {
            debug!("weasyprint stderr: {}", stderr.trim());
        }
        Ok(())
    }
}

fn resolve_python_exe(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        if let Ok(env_val) = std::env::var("HTMLPRESS_PYTHON") {
            let p = expand_tilde(&env_val);
            if p.exists() {
                return p;
            }
        }
        return PathBuf::from("python3");
    }
    expand_tilde(raw)
}
