//! Destinations for finished log lines.

use std::{fmt, io::Write};

use tracing_subscriber::fmt::MakeWriter;

/// Receives one finished log line at a time.
///
/// Implementations must not panic; failures to write are dropped.
pub trait LineSink {
    /// Writes a single line. `line` carries no trailing newline.
    fn write_line(&self, line: &str);
}

impl<T: LineSink + ?Sized> LineSink for &T {
    fn write_line(&self, line: &str) {
        (**self).write_line(line);
    }
}

impl<T: LineSink + ?Sized> LineSink for std::sync::Arc<T> {
    fn write_line(&self, line: &str) {
        (**self).write_line(line);
    }
}

/// A [`LineSink`] writing newline-terminated lines to a [`MakeWriter`], such as
/// [`std::io::stdout`] or a [`std::sync::Mutex`] around any [`Write`] implementation.
pub struct WriterSink<W> {
    make_writer: W,
}

impl<W> WriterSink<W>
where
    W: for<'a> MakeWriter<'a>,
{
    /// Creates a sink writing to the given writer.
    pub fn new(make_writer: W) -> Self {
        Self { make_writer }
    }

    /// Returns the underlying writer.
    pub fn writer(&self) -> &W {
        &self.make_writer
    }
}

impl WriterSink<fn() -> std::io::Stdout> {
    /// Creates a sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout)
    }
}

impl Default for WriterSink<fn() -> std::io::Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink").finish_non_exhaustive()
    }
}

impl<W> LineSink for WriterSink<W>
where
    W: for<'a> MakeWriter<'a>,
{
    /// Should be done by a single `write_all` call to avoid fragmentation of the line when the
    /// writer is shared between threads.
    fn write_line(&self, line: &str) {
        let mut buffer = Vec::with_capacity(line.len() + 1);
        buffer.extend_from_slice(line.as_bytes());
        buffer.push(b'\n');
        let _ = self.make_writer.make_writer().write_all(&buffer);
    }
}
