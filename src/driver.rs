//! End-to-end stream conversion: text to frames, and projection from either form.
//!
//! Every entry point validates its `Config`, processes the input strictly in
//! order, stops at the first error, and flushes `output` before returning
//! (on success and on failure). The record that caused a failure never reaches
//! the output.

use crate::codec;
use crate::config::{Config, FieldPolicy};
use crate::error::{Error, Result};
use crate::framing::{DefaultDeframer, DefaultFramer};
use crate::reader::StreamReader;
use crate::record::Record;
use crate::split::{split_fields, FieldRanges};
use crate::writer::StreamWriter;
use std::io::{BufRead, Read, Write};

/// Counters reported by a finished pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Records encoded or projected.
    pub records: u64,
    /// Empty input lines that were skipped (text input only).
    pub blank_lines: u64,
}

//--- Line input ---

/// Reads `\n`-terminated lines into a reusable buffer.
///
/// The terminator is stripped; a final line without one is still returned.
/// Blank lines are skipped and counted.
pub struct LineReader<R: BufRead> {
    input: R,
    buffer: Vec<u8>,
    line_number: u64,
    blank_lines: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buffer: Vec::new(),
            line_number: 0,
            blank_lines: 0,
        }
    }

    /// Returns the next non-blank line, or `Ok(None)` at end of input.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>> {
        loop {
            self.buffer.clear();
            if self.input.read_until(b'\n', &mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let mut len = self.buffer.len();
            if self.buffer[len - 1] == b'\n' {
                len -= 1;
            }
            if len == 0 {
                self.blank_lines += 1;
                tracing::trace!(line_number = self.line_number, "skipping blank line");
                continue;
            }
            return Ok(Some(&self.buffer[..len]));
        }
    }

    /// 1-based number of the line most recently read (blank lines included).
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn blank_lines(&self) -> u64 {
        self.blank_lines
    }
}

fn reject_line(line_number: u64, error: Error) -> Error {
    tracing::debug!(line_number, error = %error, "rejecting input line");
    error
}

fn reject_frame(frame_number: u64, error: Error) -> Error {
    tracing::debug!(frame_number, error = %error, "rejecting input frame");
    error
}

//--- Encoder ---

/// Lazily turns text lines into complete frames (length prefix + payload).
///
/// Each call to `next_frame` consumes input only up to the next non-blank line.
/// The split offsets and the writer's payload and frame buffers are reused for every line.
pub struct FrameEncoder<R: BufRead, const N: usize> {
    lines: LineReader<R>,
    delimiter: u8,
    policy: FieldPolicy,
    ranges: FieldRanges<N>,
    // Holds exactly one frame between calls.
    writer: StreamWriter<Vec<u8>, DefaultFramer>,
    records: u64,
}

impl<R: BufRead, const N: usize> FrameEncoder<R, N> {
    pub fn new(input: R, config: &Config<N>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            lines: LineReader::new(input),
            delimiter: config.delimiter(),
            policy: config.field_policy(),
            ranges: FieldRanges::new(),
            writer: StreamWriter::new(Vec::new(), DefaultFramer::new(config.max_frame_len())),
            records: 0,
        })
    }

    /// Encodes the next line. Returns `Ok(None)` once the input is exhausted.
    pub fn next_frame(&mut self) -> Result<Option<&[u8]>> {
        let Some(line) = self.lines.next_line()? else {
            return Ok(None);
        };
        if let Err(e) = split_fields(line, self.delimiter, self.policy, &mut self.ranges) {
            return Err(reject_line(self.lines.line_number(), e));
        }

        let record = Record::from_ranges(line, &self.ranges);
        self.writer.get_mut().clear();
        if let Err(e) = self.writer.write(&record) {
            return Err(reject_line(self.lines.line_number(), e));
        }
        self.records += 1;
        Ok(Some(self.writer.get_ref().as_slice()))
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            records: self.records,
            blank_lines: self.lines.blank_lines(),
        }
    }
}

/// Encodes every line of `input` as a frame on `output`.
pub fn encode_stream<R: BufRead, W: Write, const N: usize>(
    input: R,
    output: &mut W,
    config: &Config<N>,
) -> Result<StreamStats> {
    tracing::debug!(pipeline = "encode", "stream started");
    let result = encode_frames(input, output, config);
    finish("encode", output, result)
}

fn encode_frames<R: BufRead, W: Write, const N: usize>(
    input: R,
    output: &mut W,
    config: &Config<N>,
) -> Result<StreamStats> {
    let mut encoder = FrameEncoder::new(input, config)?;
    while let Some(frame) = encoder.next_frame()? {
        output.write_all(frame)?;
    }
    Ok(encoder.stats())
}

//--- Projectors ---

/// Writes `fields` joined by `delimiter` and terminated by `\n`.
pub fn write_projection<'a, W, I>(output: &mut W, delimiter: u8, fields: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a [u8]>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            output.write_all(&[delimiter])?;
        }
        output.write_all(field)?;
    }
    output.write_all(b"\n")?;
    Ok(())
}

/// Reads frames from `input`, decodes each record and writes the projected fields.
pub fn project_frames<R: Read, W: Write, const N: usize>(
    input: R,
    output: &mut W,
    config: &Config<N>,
) -> Result<StreamStats> {
    tracing::debug!(pipeline = "project frames", "stream started");
    let result = project_frames_inner(input, output, config);
    finish("project frames", output, result)
}

fn project_frames_inner<R: Read, W: Write, const N: usize>(
    input: R,
    output: &mut W,
    config: &Config<N>,
) -> Result<StreamStats> {
    config.validate()?;
    let delimiter = config.delimiter();
    let ordinals = config.projection().ordinals();
    let mut reader = StreamReader::new(input, DefaultDeframer::new(config.max_frame_len()));
    let mut stats = StreamStats::default();

    loop {
        let payload = match reader.read_message() {
            Ok(Some(payload)) => payload,
            Ok(None) => break,
            Err(e) => return Err(reject_frame(reader.frames_read() + 1, e)),
        };
        let record: Record<'_, N> = match codec::decode(payload) {
            Ok(record) => record,
            Err(e) => return Err(reject_frame(reader.frames_read(), e)),
        };
        write_projection(output, delimiter, ordinals.iter().map(|&i| &record[i]))?;
        stats.records += 1;
    }
    Ok(stats)
}

/// Text fast path: splits each line and writes the projected byte ranges directly.
///
/// Produces the same bytes as `encode_stream` followed by `project_frames` with
/// the same configuration, without building a payload.
pub fn project_text<R: BufRead, W: Write, const N: usize>(
    input: R,
    output: &mut W,
    config: &Config<N>,
) -> Result<StreamStats> {
    tracing::debug!(pipeline = "project text", "stream started");
    let result = project_text_inner(input, output, config);
    finish("project text", output, result)
}

fn project_text_inner<R: BufRead, W: Write, const N: usize>(
    input: R,
    output: &mut W,
    config: &Config<N>,
) -> Result<StreamStats> {
    config.validate()?;
    let delimiter = config.delimiter();
    let policy = config.field_policy();
    let ordinals = config.projection().ordinals();
    let mut lines = LineReader::new(input);
    let mut ranges = FieldRanges::<N>::new();
    let mut records = 0;

    while let Some(line) = lines.next_line()? {
        if let Err(e) = split_fields(line, delimiter, policy, &mut ranges) {
            return Err(reject_line(lines.line_number(), e));
        }
        write_projection(output, delimiter, ordinals.iter().map(|&i| ranges.field(line, i)))?;
        records += 1;
    }
    Ok(StreamStats {
        records,
        blank_lines: lines.blank_lines(),
    })
}

/// Flushes `output` regardless of `result`; the pipeline's own error takes precedence.
fn finish<W: Write>(
    pipeline: &'static str,
    output: &mut W,
    result: Result<StreamStats>,
) -> Result<StreamStats> {
    let flushed = output.flush();
    match (result, flushed) {
        (Ok(stats), Ok(())) => {
            tracing::debug!(
                pipeline,
                records = stats.records,
                blank_lines = stats.blank_lines,
                "stream finished"
            );
            Ok(stats)
        }
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(flush_error)) => {
            tracing::debug!(pipeline, error = %flush_error, "flush after failure also failed");
            Err(e)
        }
    }
}
