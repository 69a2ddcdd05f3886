//! The fixed-arity row data model.

use crate::split::FieldRanges;
use std::ops::Index;

/// One row of `N` fields, each a borrowed byte slice.
///
/// A `Record` built from a split line borrows the line buffer; one produced by
/// `codec::decode` borrows the frame payload. Either way no field bytes are
/// copied, and the borrow checker keeps the source buffer alive (and unmodified)
/// for as long as the record is in use. Use `to_owned_record` to keep a row
/// beyond that window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Record<'a, const N: usize> {
    fields: [&'a [u8]; N],
}

impl<'a, const N: usize> Record<'a, N> {
    pub fn new(fields: [&'a [u8]; N]) -> Self {
        Self { fields }
    }

    /// Builds a record from a line and the ranges `split_fields` produced for it.
    pub fn from_ranges(line: &'a [u8], ranges: &FieldRanges<N>) -> Self {
        Self {
            fields: std::array::from_fn(|i| ranges.field(line, i)),
        }
    }

    /// Field at `index`, or `None` if `index >= N`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.fields.get(index).copied()
    }

    pub fn fields(&self) -> &[&'a [u8]; N] {
        &self.fields
    }

    pub fn arity(&self) -> usize {
        N
    }

    /// Copies every field into an `OwnedRecord`.
    pub fn to_owned_record(&self) -> OwnedRecord<N> {
        OwnedRecord {
            fields: std::array::from_fn(|i| self.fields[i].to_vec()),
        }
    }
}

impl<const N: usize> Default for Record<'_, N> {
    fn default() -> Self {
        Self { fields: [&[][..]; N] }
    }
}

impl<'a, const N: usize> Index<usize> for Record<'a, N> {
    type Output = [u8];

    /// Panics if `index >= N`.
    fn index(&self, index: usize) -> &[u8] {
        self.fields[index]
    }
}

/// A record that owns its field bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnedRecord<const N: usize> {
    fields: [Vec<u8>; N],
}

impl<const N: usize> OwnedRecord<N> {
    pub fn new(fields: [Vec<u8>; N]) -> Self {
        Self { fields }
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.fields.get(index).map(Vec::as_slice)
    }

    /// Borrowed view suitable for encoding or projection.
    pub fn as_record(&self) -> Record<'_, N> {
        Record {
            fields: std::array::from_fn(|i| self.fields[i].as_slice()),
        }
    }

    pub fn into_fields(self) -> [Vec<u8>; N] {
        self.fields
    }
}

impl<const N: usize> Default for OwnedRecord<N> {
    fn default() -> Self {
        Self {
            fields: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl<'a, const N: usize> From<Record<'a, N>> for OwnedRecord<N> {
    fn from(record: Record<'a, N>) -> Self {
        record.to_owned_record()
    }
}
