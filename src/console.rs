//! Console progress reporting
//!
//! The orchestrator owns a [`Reporter`] and passes it wherever user-facing lines are
//! produced. Every line is mirrored to the log as a tracing event.

use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

const STEP_MARKER: &str = "==>";
const WARNING_MARKER: &str = "⚠";
const SUCCESS_MARKER: &str = "✔";

pub struct Reporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Reporter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Reporter writing into a shared buffer, for inspecting output
    pub fn capture() -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        (Self::new(Box::new(captured.clone())), captured)
    }

    /// Progress line
    pub fn step(&self, message: &str) {
        info!("{}", message);
        self.write_line(STEP_MARKER, message);
    }

    /// Recoverable problem; processing continues
    pub fn warn(&self, message: &str) {
        warn!("{}", message);
        self.write_line(WARNING_MARKER, message);
    }

    pub fn success(&self, message: &str) {
        info!("{}", message);
        self.write_line(SUCCESS_MARKER, message);
    }

    fn write_line(&self, marker: &str, message: &str) {
        if let Ok(mut out) = self.out.lock() {
            // console output is best effort; the log keeps the record
            let _ = writeln!(out, "{} {}", marker, message);
            let _ = out.flush();
        }
    }
}

/// Shared in-memory sink behind [`Reporter::capture`]
#[derive(Clone, Default)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buffer| String::from_utf8_lossy(&buffer).into_owned())
            .unwrap_or_default()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.0.lock() {
            Ok(mut buffer) => {
                buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            Err(_) => Err(std::io::Error::other("output buffer poisoned")),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_carry_their_marker() {
        let (reporter, output) = Reporter::capture();

        reporter.step("Checking foo");
        reporter.warn("Skipping bar: no tags");
        reporter.success("Wrote foo.md");

        assert_eq!(
            output.contents(),
            "==> Checking foo\n⚠ Skipping bar: no tags\n✔ Wrote foo.md\n"
        );
    }
}
