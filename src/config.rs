//! Runtime configuration threaded through the stream driver.
//!
//! Nothing here is global: a `Config<N>` value is built once by the caller and
//! passed by reference into every pipeline entry point, which validates it
//! before touching any stream.

use crate::error::{Error, Result};

/// Number of fields per record in the reference row layout.
pub const DEFAULT_ARITY: usize = 8;

/// Field delimiter used when none is configured.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Largest frame payload accepted by default (5 MiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 5 * 1024 * 1024;

/// Field ordinals projected when none are configured.
pub const DEFAULT_PROJECTION: [usize; 2] = [2, 6];

/// How the splitter treats lines whose field count differs from the arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPolicy {
    /// Exactly N fields are required.
    #[default]
    Strict,
    /// At least N fields are required; anything past field N-1 is ignored.
    Lenient,
}

/// An ordered list of field ordinals to emit, e.g. `[2, 6]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    ordinals: Vec<usize>,
}

impl Projection {
    pub fn new(ordinals: impl Into<Vec<usize>>) -> Self {
        Self {
            ordinals: ordinals.into(),
        }
    }

    pub fn ordinals(&self) -> &[usize] {
        &self.ordinals
    }

    /// Checks that the projection is non-empty and addresses only fields `0..arity`.
    pub fn validate(&self, arity: usize) -> Result<()> {
        if self.ordinals.is_empty() {
            return Err(Error::invalid_config("projection must select at least one field"));
        }
        if let Some(&bad) = self.ordinals.iter().find(|&&i| i >= arity) {
            return Err(Error::invalid_config(format!(
                "projected field {bad} is out of range for {arity}-field records"
            )));
        }
        Ok(())
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECTION)
    }
}

/// Pipeline configuration for records of arity `N`.
///
/// ```rust
/// use rowframe::{Config, FieldPolicy, Projection};
///
/// let config = Config::<8>::default()
///     .with_delimiter(b'|')
///     .with_field_policy(FieldPolicy::Lenient)
///     .with_projection(Projection::new([0, 7]));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config<const N: usize> {
    delimiter: u8,
    max_frame_len: usize,
    field_policy: FieldPolicy,
    projection: Projection,
}

impl<const N: usize> Default for Config<N> {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            field_policy: FieldPolicy::default(),
            projection: Projection::default(),
        }
    }
}

impl<const N: usize> Config<N> {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    pub fn with_field_policy(mut self, field_policy: FieldPolicy) -> Self {
        self.field_policy = field_policy;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }

    pub fn field_policy(&self) -> FieldPolicy {
        self.field_policy
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Returns `Error::InvalidConfig` describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if N == 0 {
            return Err(Error::invalid_config("record arity must be at least 1"));
        }
        if self.delimiter == b'\n' {
            return Err(Error::invalid_config("delimiter cannot be the line terminator"));
        }
        if self.max_frame_len == 0 || self.max_frame_len > i32::MAX as usize {
            return Err(Error::invalid_config(format!(
                "max frame length {} must be between 1 and {}",
                self.max_frame_len,
                i32::MAX
            )));
        }
        self.projection.validate(N)
    }
}
