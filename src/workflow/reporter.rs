//! Step progress notifications.

use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

/// Receives step lifecycle notifications.
///
/// Positions are one-based.
pub trait StepReporter: Send + Sync {
    /// A step is about to run.
    fn step_started(&self, position: usize, total: usize, step: &str);

    /// A step finished, optionally with a message.
    fn step_completed(&self, position: usize, total: usize, step: &str, message: Option<&str>);

    /// A step failed.
    fn step_failed(
        &self,
        position: usize,
        total: usize,
        step: &str,
        error: &(dyn std::error::Error + 'static),
    );
}

/// Reporter that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl StepReporter for NullReporter {
    fn step_started(&self, _position: usize, _total: usize, _step: &str) {}

    fn step_completed(&self, _position: usize, _total: usize, _step: &str, _message: Option<&str>) {}

    fn step_failed(
        &self,
        _position: usize,
        _total: usize,
        _step: &str,
        _error: &(dyn std::error::Error + 'static),
    ) {
    }
}

/// Reporter writing one plain-text line per notification.
#[derive(Debug)]
pub struct WriterReporter<W>
where
    W: Write + Send,
{
    out: Mutex<W>,
}

impl<W> WriterReporter<W>
where
    W: Write + Send,
{
    /// Creates a reporter writing to `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the writer, consuming the reporter.
    ///
    /// # Errors
    ///
    /// Returns the writer wrapped in the poison error when a writer thread
    /// panicked.
    pub fn into_inner(self) -> Result<W, std::sync::PoisonError<W>> {
        self.out.into_inner()
    }

    fn line(&self, text: &str) {
        let Ok(mut out) = self.out.lock() else {
            warn!("step reporter lock poisoned");
            return;
        };
        if let Err(err) = writeln!(out, "{text}") {
            warn!(error = %err, "failed to write step notification");
        }
    }
}

impl<W> StepReporter for WriterReporter<W>
where
    W: Write + Send,
{
    fn step_started(&self, position: usize, total: usize, step: &str) {
        self.line(&format!("[{position}/{total}] {step}..."));
    }

    fn step_completed(&self, position: usize, total: usize, step: &str, message: Option<&str>) {
        match message {
            Some(text) => self.line(&format!("[{position}/{total}] {step}: done ({text})")),
            None => self.line(&format!("[{position}/{total}] {step}: done")),
        }
    }

    fn step_failed(
        &self,
        position: usize,
        total: usize,
        step: &str,
        error: &(dyn std::error::Error + 'static),
    ) {
        self.line(&format!("[{position}/{total}] {step}: failed: {error}"));
    }
}
