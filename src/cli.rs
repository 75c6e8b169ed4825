use crate::{
    config::Config,
    engine::weasyprint::WeasyPrintProvider,
    pipeline::Pipeline,
    util::ensure_dir,
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "htmlpress")]
#[command(about = "Convert an HTML file to PDF with WeasyPrint, installing it on first use")]
pub struct Args {
    /// Defaults to `run` with the configured paths.
    #[command(subcommand)]
    pub cmd: Option<Command>,

    /// Path to config TOML. If omitted, uses ./htmlpress.toml if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Exit with status 1 when no PDF was produced.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Never attempt to install the renderer.
    #[arg(long, global = true)]
    pub no_install: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report whether the renderer is available, installable or missing.
    Doctor {},
    /// Convert the HTML input to PDF (the default).
    Run {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Returns the process exit code.
pub fn dispatch(args: Args) -> Result<i32> {
    let mut cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    apply_overrides(&args, &mut cfg);

    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    match &args.cmd {
        Some(Command::Doctor {}) => doctor(&cfg),
        Some(Command::Run { input, output }) => run(&cfg, input.as_deref(), output.as_deref()),
        None => run(&cfg, None, None),
    }
}

pub fn apply_overrides(args: &Args, cfg: &mut Config) {
    if args.strict {
        cfg.global.strict_exit = true;
    }
    if args.no_install {
        cfg.install.enabled = false;
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("htmlpress.toml");
    default.exists().then_some(default)
}

/// Console logs go to stderr; stdout carries the status lines and JSON.
fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    let console_layer = if cfg.logging.json {
        console.json().boxed()
    } else {
        console.boxed()
    };

    let mut guard = None;
    let file_layer = match file_path {
        Some(path) => {
            ensure_dir(path.parent().unwrap_or_else(|| Path::new(".")))?;
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file: {}", path.display()))?;
            let (writer, g) = tracing_appender::non_blocking(file);
            guard = Some(g);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<i32> {
    let provider = WeasyPrintProvider::new(cfg);
    let diag = provider.diagnose();
    println!("{}", serde_json::to_string_pretty(&diag)?);
    Ok(0)
}

fn run(cfg: &Config, input: Option<&Path>, output: Option<&Path>) -> Result<i32> {
    let input = input
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.input_html));
    let output = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.output_pdf));

    if cfg.debug.dump_effective_config {
        debug!("effective config:\n{}", toml::to_string(cfg).unwrap_or_default());
    }

    let pipeline = Pipeline::new(cfg, WeasyPrintProvider::new(cfg));
    let report = pipeline.run(&input, &output);

    if cfg.global.print_summary {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(exit_code(cfg, report.status.is_success()))
}

/// Compatibility mode exits 0 even when no PDF was produced.
pub fn exit_code(cfg: &Config, success: bool) -> i32 {
    if success || !cfg.global.strict_exit {
        0
    } else {
        info!("strict_exit set; reporting failure through exit status");
        1
    }
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    Some(PathBuf::from("htmlpress.log"))
}
