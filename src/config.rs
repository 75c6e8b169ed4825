use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub renderer: Renderer,
    #[serde(default)]
    pub install: Install,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
    #[serde(default)]
    pub security: Security,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Global {
    pub title: String,
    /// Exit non-zero when the PDF was not produced.
    pub strict_exit: bool,
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            title: "Nomado Gantt Chart PDF Generator".into(),
            strict_exit: false,
            print_summary: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub input_html: String,
    pub output_pdf: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            input_html: "/home/diesel/Desktop/nomado-houses/GANTT_CHART.html".into(),
            output_pdf: "/home/diesel/Desktop/nomado-houses/GANTT_CHART.pdf".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Renderer {
    /// `auto` tries `weasyprint` on PATH, then `<python> -m weasyprint`.
    pub program: String,
    pub python_exe: String,
    pub extra_args: Vec<String>,
    pub probe_timeout_seconds: u64,
    /// 0 disables the timeout.
    pub render_timeout_seconds: u64,
    pub env: std::collections::BTreeMap<String, String>,
}
impl Default for Renderer {
    fn default() -> Self {
        Self {
            program: "auto".into(),
            python_exe: "auto".into(),
            extra_args: Vec::new(),
            probe_timeout_seconds: 30,
            render_timeout_seconds: 0,
            env: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Install {
    pub enabled: bool,
    pub package: String,
    pub pip_args: Vec<String>,
    pub timeout_seconds: u64,
}
impl Default for Install {
    fn default() -> Self {
        Self {
            enabled: true,
            package: "weasyprint".into(),
            pip_args: Vec::new(),
            timeout_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub create_parent_dirs: bool,
    pub remove_partial_on_failure: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            create_parent_dirs: true,
            remove_partial_on_failure: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Debug {
    /// Log a successful render's stderr at debug level. Failures always
    /// carry stderr in their error message.
    pub log_renderer_stderr: bool,
    pub dump_effective_config: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            log_renderer_stderr: true,
            dump_effective_config: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Security {
    pub reject_url_inputs: bool,
}
impl Default for Security {
    fn default() -> Self {
        Self {
            reject_url_inputs: true,
        }
    }
}
