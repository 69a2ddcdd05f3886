//! A generic, composable reader for framed record streams.

use crate::codec;
use crate::error::Result;
use crate::framing::Deframer;
use crate::record::{OwnedRecord, Record};
use std::io::Read;

/// A reader for streaming frames and records.
///
/// This reader is generic over a `Deframer` strategy, which defines how
/// each frame is parsed from the byte stream. It provides two APIs:
///
/// 1. **Processor API** (`process_all()`, `process_records()`): closure-based processing
/// 2. **Expert API** (`messages()`): Manual iteration for maximum control
///
/// Both hand out slices and records that borrow the reader's internal buffer,
/// so nothing is copied per frame. The borrow ends before the next read.
///
/// ```rust
/// # use rowframe::{StreamReader, DefaultDeframer, Record, Result};
/// # use std::io::Cursor;
/// # let mut reader = StreamReader::new(Cursor::new(vec![]), DefaultDeframer::default());
///
/// // Processor API over decoded records
/// reader.process_records(|record: Record<'_, 8>| {
///     println!("field 2: {:?}", &record[2]);
///     Ok(())
/// })?;
///
/// // Expert API for manual control over raw payloads
/// let mut messages = reader.messages();
/// while let Some(payload) = messages.next()? {
///     println!("Frame: {} bytes", payload.len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StreamReader<R: Read, D: Deframer> {
    reader: R,
    deframer: D,
    // Reused for every frame; never grows beyond the deframer's limit.
    buffer: Vec<u8>,
    frames_read: u64,
}

impl<R: Read, D: Deframer> StreamReader<R, D> {
    /// Creates a new `StreamReader` with the given reader and deframing strategy.
    pub fn new(reader: R, deframer: D) -> Self {
        Self {
            reader,
            deframer,
            buffer: Vec::new(),
            frames_read: 0,
        }
    }

    /// Reads the next frame payload into the internal buffer.
    /// Returns Ok(Some(payload)) on success, Ok(None) on clean EOF.
    pub fn read_message(&mut self) -> Result<Option<&[u8]>> {
        match self
            .deframer
            .read_and_deframe(&mut self.reader, &mut self.buffer)?
        {
            Some(_) => {
                self.frames_read += 1;
                Ok(Some(&self.buffer))
            }
            None => Ok(None),
        }
    }

    /// Reads and decodes the next frame. The record borrows the internal buffer.
    pub fn read_record<const N: usize>(&mut self) -> Result<Option<Record<'_, N>>> {
        match self.read_message()? {
            Some(payload) => Ok(Some(codec::decode(payload)?)),
            None => Ok(None),
        }
    }

    /// Reads and decodes the next frame into a record that owns its bytes.
    pub fn read_owned_record<const N: usize>(&mut self) -> Result<Option<OwnedRecord<N>>> {
        Ok(self
            .read_record::<N>()?
            .map(|record| record.to_owned_record()))
    }

    /// Processes all frames in the stream using a closure.
    ///
    /// The closure receives each payload and should return `Ok(())` to continue
    /// processing or an error to stop.
    pub fn process_all<F>(&mut self, mut processor: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        while let Some(payload) = self.read_message()? {
            processor(payload)?;
        }
        Ok(())
    }

    /// Decodes every frame and passes the record to `processor`.
    ///
    /// Stops at the first read, decode or processor error.
    pub fn process_records<const N: usize, F>(&mut self, mut processor: F) -> Result<()>
    where
        F: FnMut(Record<'_, N>) -> Result<()>,
    {
        self.process_all(|payload| processor(codec::decode(payload)?))
    }

    /// Returns an iterator-like object for manual frame processing.
    pub fn messages(&mut self) -> Messages<'_, R, D> {
        Messages { reader: self }
    }

    /// Number of complete frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Consumes the reader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// An iterator-like object for manual frame processing.
///
/// It borrows the `StreamReader` mutably, so each payload must be dropped
/// before the next call to `next()`.
pub struct Messages<'a, R: Read, D: Deframer> {
    reader: &'a mut StreamReader<R, D>,
}

impl<'a, R: Read, D: Deframer> Messages<'a, R, D> {
    /// Returns the next frame payload in the stream.
    ///
    /// # Returns
    /// * `Ok(Some(payload))` - A frame was successfully read
    /// * `Ok(None)` - End of stream reached
    /// * `Err(e)` - An error occurred during reading
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<&[u8]>> {
        self.reader.read_message()
    }
}
