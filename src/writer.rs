//! A generic, composable writer for framed record streams.

use crate::codec;
use crate::error::Result;
use crate::framing::Framer;
use crate::record::Record;
use std::io::Write;

/// A writer for streaming records as frames.
///
/// This writer is generic over a `Framer` strategy, which defines how
/// each payload is framed in the byte stream.
///
/// The writer provides two levels of API:
/// 1. `write()` - Encodes a record into an internal reusable buffer and frames it
/// 2. `write_payload()` - Lowest-level API for pre-encoded payloads
pub struct StreamWriter<W: Write, F: Framer> {
    writer: W,
    framer: F,
    // Payload scratch buffer reused across records.
    payload: Vec<u8>,
}

impl<W: Write, F: Framer> StreamWriter<W, F> {
    /// Creates a new `StreamWriter`.
    pub fn new(writer: W, framer: F) -> Self {
        Self {
            writer,
            framer,
            payload: Vec::new(),
        }
    }

    /// Encodes `record` and writes it as one frame.
    ///
    /// The payload is fully encoded before anything reaches the underlying
    /// writer, so a framing error never leaves a partial frame behind.
    pub fn write<const N: usize>(&mut self, record: &Record<'_, N>) -> Result<()> {
        self.payload.clear();
        codec::encode_into(record, &mut self.payload);
        self.framer.frame_and_write(&mut self.writer, &self.payload)
    }

    /// Writes an already-encoded payload as one frame.
    pub fn write_payload(&mut self, payload: &[u8]) -> Result<()> {
        self.framer.frame_and_write(&mut self.writer, payload)
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes the writer, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
