use anyhow::{Context, Result, anyhow, bail};
use std::io::Read;
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How long pipe readers may lag behind the process they belong to.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Spawn `cmd` with captured output and wait for it.
///
/// With a `timeout` the child gets its own process group, and the whole
/// group is killed once the deadline passes.
pub fn run(mut cmd: Command, timeout: Option<Duration>) -> Result<Output> {
    debug!("spawn {:?} timeout={:?}", cmd, timeout);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    if timeout.is_some() {
        own_process_group(&mut cmd);
    }

    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning {program}"))?;

    match timeout {
        Some(t) => wait_until(&mut child, Instant::now() + t, t),
        None => child
            .wait_with_output()
            .with_context(|| format!("waiting for {program}")),
    }
}

/// `Some(secs)` for a positive number of seconds, `None` for 0.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn wait_until(child: &mut Child, deadline: Instant, timeout: Duration) -> Result<Output> {
    let stdout_rx = drain(child.stdout.take());
    let stderr_rx = drain(child.stderr.take());

    loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            let budget = deadline.saturating_duration_since(Instant::now()).max(DRAIN_GRACE);
            return Ok(Output {
                status,
                stdout: collect(&stdout_rx, budget, "stdout")?,
                stderr: collect(&stderr_rx, budget, "stderr")?,
            });
        }

        if Instant::now() >= deadline {
            info!("pid {} timed out after {:?}; killing its group", child.id(), timeout);
            kill_process_group(child);
            let _ = child.kill();
            child.wait().with_context(|| "wait after kill")?;
            // leftover grandchildren may still hold the pipe; don't wait on them
            let stderr = stderr_rx
                .recv_timeout(DRAIN_GRACE)
                .ok()
                .and_then(|r| r.ok())
                .unwrap_or_default();
            return Err(anyhow!(
                "process exceeded timeout ({:?}); stderr: {}",
                timeout,
                String::from_utf8_lossy(&stderr).trim()
            ));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<std::io::Result<Vec<u8>>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let res = match pipe {
            Some(mut p) => p.read_to_end(&mut buf).map(|_| buf),
            None => Ok(buf),
        };
        let _ = tx.send(res);
    });
    rx
}

fn collect(
    rx: &Receiver<std::io::Result<Vec<u8>>>,
    budget: Duration,
    which: &str,
) -> Result<Vec<u8>> {
    match rx.recv_timeout(budget) {
        Ok(res) => res.with_context(|| format!("read {which}")),
        Err(_) => bail!("{which} still open {budget:?} after the process exited"),
    }
}

#[cfg(unix)]
fn own_process_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_cmd: &mut Command) {}

#[cfg(unix)]
fn kill_process_group(child: &Child) {
    let group = format!("-{}", child.id());
    let status = Command::new("kill")
        .args(["-KILL", "--", &group])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(s) if s.success() => {}
        Ok(s) => debug!("kill {group} exited with {s}"),
        Err(err) => debug!("kill {group} could not run: {err}"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}
