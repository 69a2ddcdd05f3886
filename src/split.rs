//! Single-pass field splitting over a raw line.
//!
//! The splitter never allocates: it records `(start, end)` offsets into a
//! caller-owned `FieldRanges<N>` table that the driver reuses for every line.

use crate::config::FieldPolicy;
use crate::error::{Error, Result};
use std::ops::Range;

/// Reusable offset table holding one byte range per field.
///
/// Only meaningful after a successful `split_fields` call; a failed split
/// leaves the table in an unspecified (but memory-safe) state.
#[derive(Debug, Clone)]
pub struct FieldRanges<const N: usize> {
    starts: [usize; N],
    ends: [usize; N],
}

impl<const N: usize> FieldRanges<N> {
    pub fn new() -> Self {
        Self {
            starts: [0; N],
            ends: [0; N],
        }
    }

    /// Byte range of field `index` within the line that was split.
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn range(&self, index: usize) -> Range<usize> {
        self.starts[index]..self.ends[index]
    }

    /// Slices field `index` out of `line`.
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn field<'a>(&self, line: &'a [u8], index: usize) -> &'a [u8] {
        &line[self.range(index)]
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<const N: usize> Default for FieldRanges<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `line` (without its terminator) into exactly `N` field ranges.
///
/// Scans once left to right. Each delimiter closes the current field and opens
/// the next one at the following byte; the last field closes at line end.
///
/// * Fewer than `N` fields is always `Error::MalformedRecord`.
/// * More than `N` fields is `Error::MalformedRecord` under `FieldPolicy::Strict`.
///   Under `FieldPolicy::Lenient` the extra fields are ignored and field `N - 1`
///   ends at the `N`-th delimiter.
pub fn split_fields<const N: usize>(
    line: &[u8],
    delimiter: u8,
    policy: FieldPolicy,
    ranges: &mut FieldRanges<N>,
) -> Result<()> {
    if N == 0 {
        return Err(Error::invalid_config("record arity must be at least 1"));
    }

    let mut found = 0;
    let mut start = 0;
    for (i, &byte) in line.iter().enumerate() {
        if byte != delimiter {
            continue;
        }
        ranges.starts[found] = start;
        ranges.ends[found] = i;
        found += 1;
        start = i + 1;

        if found == N {
            // This delimiter opened field N, which the arity has no room for.
            return match policy {
                FieldPolicy::Lenient => Ok(()),
                FieldPolicy::Strict => {
                    let extra = line[start..].iter().filter(|&&b| b == delimiter).count();
                    Err(Error::malformed_record(N, N + 1 + extra))
                }
            };
        }
    }

    ranges.starts[found] = start;
    ranges.ends[found] = line.len();
    found += 1;

    if found < N {
        return Err(Error::malformed_record(N, found));
    }
    Ok(())
}
