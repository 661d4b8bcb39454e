//! Narrative backends available to the runner.
//!
//! The core only sees the NarrativeBackend trait. The runner either
//! pipes the prompt to an external command (any CLI that prints the
//! model's reply on stdout) or has no backend at all, in which case
//! the core's fallback summary is used.

use anyhow::{bail, Context, Result};
use staffing_core::narrative::NarrativeBackend;
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `program args...`, writes the system instruction and prompt to
/// its stdin and treats its stdout as the reply.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args:    Vec<String>,
    timeout: Duration,
}

impl CommandBackend {
    /// `command_line` is split on whitespace: the first word is the program.
    pub fn parse(command_line: &str, timeout: Duration) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
            timeout,
        })
    }
}

impl NarrativeBackend for CommandBackend {
    fn complete(&self, system: &str, prompt: &str) -> Result<Option<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Cannot start narrative command '{}'", self.program))?;

        // Drain stdout before writing so a chatty child cannot block on a full pipe.
        let mut stdout = child.stdout.take().context("narrative command has no stdout")?;
        let reader = thread::spawn(move || {
            let mut out = String::new();
            stdout.read_to_string(&mut out).map(|_| out)
        });

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(format!("{system}\n\n{prompt}").as_bytes()) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e).context("writing prompt to narrative command");
            }
        }

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                bail!("narrative command timed out after {:?}", self.timeout);
            }
            thread::sleep(POLL_INTERVAL);
        };

        let out = reader
            .join()
            .map_err(|_| anyhow::anyhow!("narrative reader thread panicked"))??;
        if !status.success() {
            bail!("narrative command exited with {status}");
        }
        Ok(Some(out).filter(|s| !s.trim().is_empty()))
    }
}

/// Used when no narrative command is configured.
pub struct NoBackend;

impl NarrativeBackend for NoBackend {
    fn complete(&self, _system: &str, _prompt: &str) -> Result<Option<String>> {
        bail!("no narrative backend configured (pass --narrative-cmd)")
    }
}
