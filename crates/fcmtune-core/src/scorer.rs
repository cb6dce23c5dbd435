// crates/fcmtune-core/src/scorer.rs
//
// External context-model scorer.
//
// Contract: `<scorer> <sequence> -k <k> -a <alpha>` writes one data line per
// scored symbol to stdout (`<position> <bits> <symbol>`). Anything else on
// stdout is diagnostics; stderr is ignored.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

/// One point of the (k, alpha) grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Configuration {
    pub k: u32,
    pub alpha: f64,
}

impl Configuration {
    pub fn new(k: u32, alpha: f64) -> Self {
        Self { k, alpha }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k={} alpha={}", self.k, self.alpha)
    }
}

/// Why a single invocation produced no data. Never fatal to a search.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
pub enum ScorerError {
    #[error("failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("scorer exited with {0}")]
    Exit(String),

    #[error("scorer timed out after {0:?}")]
    Timeout(Duration),

    #[error("scorer io: {0}")]
    Io(String),
}

pub trait Scorer {
    /// Run the model once and return its raw stdout.
    fn run(&self, sequence: &Path, k: u32, alpha: f64) -> Result<String, ScorerError>;
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn run(&self, sequence: &Path, k: u32, alpha: f64) -> Result<String, ScorerError> {
        (**self).run(sequence, k, alpha)
    }
}

/// Spawns the scorer executable and waits for it.
#[derive(Clone, Debug)]
pub struct ProcessScorer {
    program: PathBuf,
    timeout: Option<Duration>,
    poll: Duration,
}

impl ProcessScorer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            poll: Duration::from_millis(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, sequence: &Path, k: u32, alpha: f64) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(sequence)
            .arg("-k")
            .arg(k.to_string())
            .arg("-a")
            .arg(alpha.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        cmd
    }
}

impl Scorer for ProcessScorer {
    fn run(&self, sequence: &Path, k: u32, alpha: f64) -> Result<String, ScorerError> {
        let mut child = self
            .command(sequence, k, alpha)
            .spawn()
            .map_err(|e| ScorerError::Spawn {
                program: self.program.display().to_string(),
                reason: e.to_string(),
            })?;

        // Drain stdout on a separate thread so a chatty scorer cannot block on
        // a full pipe while we poll for exit. The buffer comes back over a
        // channel so the drain shares the invocation deadline.
        let mut stdout = match child.stdout.take() {
            Some(out) => out,
            None => {
                reap(&mut child);
                return Err(ScorerError::Io("stdout not captured".into()));
            }
        };
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        let start = Instant::now();
        let status = match self.timeout {
            None => match child.wait() {
                Ok(status) => status,
                Err(e) => {
                    reap(&mut child);
                    return Err(ScorerError::Io(e.to_string()));
                }
            },
            Some(limit) => loop {
                match child.try_wait() {
                    Ok(Some(status)) => break status,
                    Ok(None) if start.elapsed() >= limit => {
                        reap(&mut child);
                        return Err(ScorerError::Timeout(limit));
                    }
                    Ok(None) => std::thread::sleep(self.poll),
                    Err(e) => {
                        reap(&mut child);
                        return Err(ScorerError::Io(e.to_string()));
                    }
                }
            },
        };

        // A process the scorer left behind may still hold the pipe open. On
        // timeout the reader thread is left detached.
        let drained = match self.timeout {
            None => rx.recv().map_err(|_| ScorerError::Io("stdout reader panicked".into()))?,
            Some(limit) => match rx.recv_timeout(limit.saturating_sub(start.elapsed())) {
                Ok(res) => res,
                Err(mpsc::RecvTimeoutError::Timeout) => return Err(ScorerError::Timeout(limit)),
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(ScorerError::Io("stdout reader panicked".into()))
                }
            },
        };
        let bytes = drained.map_err(|e| ScorerError::Io(e.to_string()))?;

        if !status.success() {
            return Err(ScorerError::Exit(status.to_string()));
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
