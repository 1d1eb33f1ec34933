//! Running external tools

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::stage::Invocation;
use crate::log::{debug, warn};

/// Interval between exit checks of a running tool.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long output is still collected after the deadline.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Runs an invocation to completion and returns its combined output.
///
/// Never fails: problems starting or waiting for the tool end up in the
/// returned log, and the caller checks the produced artifact instead.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> String;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, invocation: &Invocation) -> String {
        (**self).run(invocation)
    }
}

/// Spawns real processes, killing them after `timeout`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    pub timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> String {
        debug!(command = %invocation.display(), cwd = %invocation.cwd.display(), "running");

        let spawned = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => {
                warn!(command = %invocation.display(), %err, "cannot start tool");
                return format!("cannot run {}: {err}\n", invocation.program.to_string_lossy());
            }
        };

        // Drain both pipes so a chatty tool never blocks on a full pipe.
        let (tx, rx) = mpsc::channel();
        let mut readers = 0;
        if let Some(pipe) = child.stdout.take() {
            spawn_reader(0, pipe, tx.clone());
            readers += 1;
        }
        if let Some(pipe) = child.stderr.take() {
            spawn_reader(1, pipe, tx.clone());
            readers += 1;
        }
        drop(tx);

        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut trailer = String::new();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if !status.success() {
                        trailer = format!(
                            "\n{} exited with {status}\n",
                            invocation.program.to_string_lossy()
                        );
                    }
                    break;
                }
                Ok(None) => {
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        let _ = child.kill();
                        let _ = child.wait();
                        warn!(command = %invocation.display(), "tool timed out and was killed");
                        trailer = format!(
                            "\n{} killed after {:?}\n",
                            invocation.program.to_string_lossy(),
                            self.timeout.unwrap_or_default()
                        );
                        break;
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(err) => {
                    trailer = format!("\ncannot wait for {}: {err}\n", invocation.program.to_string_lossy());
                    break;
                }
            }
        }

        // Helpers forked by the tool may still hold the pipes open; stop
        // waiting for them at the deadline, or shortly after a kill.
        let drain_until = deadline.map(|d| d.max(Instant::now() + DRAIN_GRACE));
        let mut outputs = [String::new(), String::new()];
        for _ in 0..readers {
            let received = match drain_until {
                Some(limit) => rx.recv_timeout(limit.saturating_duration_since(Instant::now())).ok(),
                None => rx.recv().ok(),
            };
            match received {
                Some((index, text)) => outputs[index] = text,
                None => {
                    warn!(command = %invocation.display(), "tool output still open, detaching readers");
                    break;
                }
            }
        }

        let [mut log, stderr] = outputs;
        log.push_str(&stderr);
        log.push_str(&trailer);
        log
    }
}

fn spawn_reader(index: usize, pipe: impl Read + Send + 'static, tx: mpsc::Sender<(usize, String)>) {
    thread::spawn(move || {
        let _ = tx.send((index, read_lossy(pipe)));
    });
}

fn read_lossy(mut pipe: impl Read) -> String {
    let mut bytes = Vec::new();
    let _ = pipe.read_to_end(&mut bytes);
    String::from_utf8_lossy(&bytes).into_owned()
}
