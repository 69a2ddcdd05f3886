//! Defines the framing and deframing strategies for the byte stream.
//!
//! Wire format per frame: `[4-byte little-endian i32 length | payload]`.

use crate::config::DEFAULT_MAX_FRAME_LEN;
use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Write};

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Largest payload the signed 32-bit header can describe.
pub const MAX_HEADER_LEN: usize = i32::MAX as usize;

//--- Framer Trait and Implementations ---

/// A trait that defines how a raw payload is framed and written to a stream.
///
/// Purpose: Separate wire-format concerns (headers) from I/O and record encoding.
/// Implementations are small strategy objects composed into `StreamWriter`.
pub trait Framer {
    fn frame_and_write<W: Write>(&self, writer: &mut W, payload: &[u8]) -> Result<()>;
}

/// The default framing strategy: `[4-byte i32 length | payload]`.
///
/// Refuses payloads longer than `max_frame_len` so that everything it writes can
/// be read back by a `DefaultDeframer` with the same limit.
#[derive(Debug, Clone, Copy)]
pub struct DefaultFramer {
    max_frame_len: usize,
}

impl DefaultFramer {
    /// Creates a framer with the given payload limit (clamped to the header range).
    pub fn new(max_frame_len: usize) -> Self {
        Self {
            max_frame_len: max_frame_len.min(MAX_HEADER_LEN),
        }
    }

    pub fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }
}

impl Default for DefaultFramer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_LEN)
    }
}

impl Framer for DefaultFramer {
    fn frame_and_write<W: Write>(&self, writer: &mut W, payload: &[u8]) -> Result<()> {
        if payload.len() > self.max_frame_len {
            return Err(Error::frame_too_large(payload.len(), self.max_frame_len));
        }
        let payload_len = payload.len() as i32;
        writer.write_all(&payload_len.to_le_bytes())?;
        writer.write_all(payload)?;
        Ok(())
    }
}

//--- Deframer Trait and Implementations ---

/// A trait that defines how a message is deframed and read from a stream.
///
/// Purpose: Parse a framed stream into payload buffers, validating headers.
pub trait Deframer {
    /// Returns Ok(Some(())) on success, Ok(None) on clean EOF at a frame boundary.
    fn read_and_deframe<R: Read>(&self, reader: &mut R, buffer: &mut Vec<u8>)
        -> Result<Option<()>>;
}

/// The default deframing strategy with a mandatory length limit.
///
/// The declared length is checked against `max_frame_len` before the payload
/// buffer is resized, so a corrupt prefix can never trigger an allocation larger
/// than the limit.
#[derive(Debug, Clone, Copy)]
pub struct DefaultDeframer {
    max_frame_len: usize,
}

impl DefaultDeframer {
    pub fn new(max_frame_len: usize) -> Self {
        Self {
            max_frame_len: max_frame_len.min(MAX_HEADER_LEN),
        }
    }

    pub fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }
}

impl Default for DefaultDeframer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_LEN)
    }
}

impl Deframer for DefaultDeframer {
    fn read_and_deframe<R: Read>(
        &self,
        reader: &mut R,
        buffer: &mut Vec<u8>,
    ) -> Result<Option<()>> {
        let mut len_bytes = [0u8; LENGTH_PREFIX_LEN];
        match read_full(reader, &mut len_bytes)? {
            0 => return Ok(None), // Clean EOF
            LENGTH_PREFIX_LEN => {}
            n => return Err(Error::truncated_frame(LENGTH_PREFIX_LEN, n)),
        }

        let declared = i32::from_le_bytes(len_bytes);
        let payload_len = usize::try_from(declared)
            .map_err(|_| Error::invalid_frame(format!("negative length prefix {declared}")))?;
        if payload_len > self.max_frame_len {
            return Err(Error::frame_too_large(payload_len, self.max_frame_len));
        }

        buffer.resize(payload_len, 0);
        let read = read_full(reader, buffer)?;
        if read != payload_len {
            buffer.truncate(read);
            return Err(Error::truncated_frame(payload_len, read));
        }
        Ok(Some(()))
    }
}

/// Fills `buf` from `reader`, stopping early only at end of stream.
///
/// Returns the number of bytes read. Unlike `read_exact` this reports how far
/// it got, which lets callers tell a clean EOF (0) from a truncated frame.
/// `Interrupted` reads are retried.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

//--- Convenience functions ---

/// Writes one frame (`i32` little-endian length followed by `payload`).
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    DefaultFramer::new(MAX_HEADER_LEN).frame_and_write(writer, payload)
}

/// Reads one frame into `buffer`, rejecting declared lengths above `max_frame_len`.
///
/// Returns `Ok(None)` on a clean end of stream.
pub fn read_frame<'b, R: Read>(
    reader: &mut R,
    max_frame_len: usize,
    buffer: &'b mut Vec<u8>,
) -> Result<Option<&'b [u8]>> {
    match DefaultDeframer::new(max_frame_len).read_and_deframe(reader, buffer)? {
        Some(()) => Ok(Some(buffer.as_slice())),
        None => Ok(None),
    }
}
