use std::io::Write;

use tracing::debug;

use crate::highlight::Palette;

/// Receives output chunks while a child process is still running.
pub trait OutputSink {
    fn stdout_chunk(&mut self, chunk: &[u8]);
    fn stderr_chunk(&mut self, chunk: &[u8]);
}

/// Drops everything.
pub struct NullSink;

impl OutputSink for NullSink {
    fn stdout_chunk(&mut self, _chunk: &[u8]) {}
    fn stderr_chunk(&mut self, _chunk: &[u8]) {}
}

/// Echoes chunks to a terminal writer, painting stderr red.
///
/// Stderr has to be decoded before it can be painted, so a UTF-8 sequence cut
/// by a chunk boundary is held back until the rest of it arrives.
pub struct WriterSink<'a> {
    out: &'a mut dyn Write,
    palette: Palette,
    stderr_tail: Vec<u8>,
}

impl<'a> WriterSink<'a> {
    pub fn new(out: &'a mut dyn Write, palette: Palette) -> Self {
        Self {
            out,
            palette,
            stderr_tail: Vec::new(),
        }
    }

    fn paint_stderr(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let painted = self.palette.error(&String::from_utf8_lossy(bytes));
        self.forward(painted.as_bytes());
    }

    fn forward(&mut self, bytes: &[u8]) {
        let result = self.out.write_all(bytes).and_then(|_| self.out.flush());
        if let Err(e) = result {
            debug!(error = %e, "terminal write failed");
        }
    }
}

impl OutputSink for WriterSink<'_> {
    fn stdout_chunk(&mut self, chunk: &[u8]) {
        self.forward(chunk);
    }

    fn stderr_chunk(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.stderr_tail);
        bytes.extend_from_slice(chunk);

        // Only an incomplete sequence at the very end is kept; invalid bytes
        // elsewhere are replaced now.
        let ready = match std::str::from_utf8(&bytes) {
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            _ => bytes.len(),
        };
        self.stderr_tail = bytes.split_off(ready);
        self.paint_stderr(&bytes);
    }
}

impl Drop for WriterSink<'_> {
    fn drop(&mut self) {
        let tail = std::mem::take(&mut self.stderr_tail);
        self.paint_stderr(&tail);
    }
}
