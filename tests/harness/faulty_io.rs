use std::io::{self, Read, Write};

/// Wraps a reader and misbehaves in a controlled way.
pub struct FaultyReader<R: Read> {
    inner: R,
    mode: FaultMode,
    calls: usize,
    delivered: usize,
}

#[allow(dead_code)]
pub enum FaultMode {
    /// Every read returns at most one byte.
    OneByteChunks,
    /// Every n-th read call fails with `Interrupted`.
    InterruptedEvery(usize),
    /// Reports end of stream once this many bytes have been delivered.
    EofAfterBytes(usize),
    /// Fails with `Other` once this many bytes have been delivered.
    ErrorAfterBytes(usize),
}

impl<R: Read> FaultyReader<R> {
    pub fn new(inner: R, mode: FaultMode) -> Self {
        Self {
            inner,
            mode,
            calls: 0,
            delivered: 0,
        }
    }
}

impl<R: Read> Read for FaultyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        let limit = match self.mode {
            FaultMode::OneByteChunks => buf.len().min(1),
            FaultMode::InterruptedEvery(n) if n != 0 && self.calls % n == 0 => {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            FaultMode::EofAfterBytes(n) => buf.len().min(n.saturating_sub(self.delivered)),
            FaultMode::ErrorAfterBytes(n) if self.delivered >= n => {
                return Err(io::Error::new(io::ErrorKind::Other, "injected read failure"));
            }
            FaultMode::ErrorAfterBytes(n) => buf.len().min(n - self.delivered),
            _ => buf.len(),
        };
        if limit == 0 {
            return Ok(0);
        }
        let n = self.inner.read(&mut buf[..limit])?;
        self.delivered += n;
        Ok(n)
    }
}

/// A writer that accepts `fail_after` bytes, then fails every write.
/// Records everything accepted and how often it was flushed.
pub struct FailingWriter {
    pub accepted: Vec<u8>,
    pub fail_after: usize,
    pub flushes: usize,
}

impl FailingWriter {
    pub fn new(fail_after: usize) -> Self {
        Self {
            accepted: Vec::new(),
            fail_after,
            flushes: 0,
        }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.accepted.len() >= self.fail_after {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "Simulated I/O error"));
        }
        let n = (self.fail_after - self.accepted.len()).min(buf.len());
        self.accepted.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Counts flushes without ever failing.
#[derive(Default)]
pub struct FlushCounter {
    pub data: Vec<u8>,
    pub flushes: usize,
}

impl Write for FlushCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
