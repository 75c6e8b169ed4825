#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use htmlpress::engine::{CapabilityProvider, Renderer};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, Copy)]
pub enum RenderMode {
    WritePdf,
    Fail,
    WriteGarbage,
    /// Reports success without touching the output.
    Silent,
}

pub struct FakeRenderer {
    pub mode: RenderMode,
    pub calls: Rc<Cell<u32>>,
}

impl FakeRenderer {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl Renderer for FakeRenderer {
    fn describe(&self) -> String {
        "FakePrint version 1.0".into()
    }

    fn render(&self, input: &Path, output: &Path) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        let html = std::fs::read_to_string(input)?;
        match self.mode {
            RenderMode::WritePdf => {
                let body = format!("%PDF-1.7\n% {} bytes of html\n%%EOF\n", html.len());
                std::fs::write(output, body)?;
                Ok(())
            }
            RenderMode::Fail => bail!("font configuration error"),
            RenderMode::WriteGarbage => {
                std::fs::write(output, b"<html>not a pdf</html>")?;
                Ok(())
            }
            RenderMode::Silent => Ok(()),
        }
    }
}

pub struct FakeProvider {
    pub available: Cell<bool>,
    pub installable: bool,
    pub install_succeeds: bool,
    pub resolves: Cell<u32>,
    pub installs: Cell<u32>,
    pub mode: RenderMode,
    pub render_calls: Rc<Cell<u32>>,
}

impl FakeProvider {
    pub fn already_available() -> Self {
        Self::build(true, true, true)
    }

    pub fn installable(install_succeeds: bool) -> Self {
        Self::build(false, true, install_succeeds)
    }

    pub fn unavailable() -> Self {
        Self::build(false, false, false)
    }

    fn build(available: bool, installable: bool, install_succeeds: bool) -> Self {
        Self {
            available: Cell::new(available),
            installable,
            install_succeeds,
            resolves: Cell::new(0),
            installs: Cell::new(0),
            mode: RenderMode::WritePdf,
            render_calls: Rc::new(Cell::new(0)),
        }
    }
}

impl CapabilityProvider for FakeProvider {
    type Renderer = FakeRenderer;

    fn name(&self) -> &str {
        "FakePrint"
    }

    fn resolve(&self) -> Result<FakeRenderer> {
        self.resolves.set(self.resolves.get() + 1);
        if self.available.get() {
            Ok(FakeRenderer {
                mode: self.mode,
                calls: Rc::clone(&self.render_calls),
            })
        } else {
            Err(anyhow!("No module named 'fakeprint'"))
        }
    }

    fn can_install(&self) -> bool {
        self.installable
    }

    fn install(&self) -> Result<()> {
        self.installs.set(self.installs.get() + 1);
        if self.install_succeeds {
            self.available.set(true);
            Ok(())
        } else {
            bail!("pip exited with status 1: network unreachable")
        }
    }
}

pub const MINIMAL_HTML: &str = "<html><body>Hi</body></html>";

pub fn write_html(dir: &Path, name: &str) -> std::path::PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, MINIMAL_HTML).expect("write html");
    p
}

pub const STALE_PDF: &[u8] = b"%PDF-1.4 stale from yesterday";

/// Sorted file names in `dir`.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
