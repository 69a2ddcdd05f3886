//! # rowframe
//!
//! Streaming conversion between delimiter-separated text rows and a compact,
//! length-prefixed binary record format, plus zero-copy field projection over
//! either representation.
//!
//! ## Overview
//!
//! Two pipelines share one data model, the fixed-arity [`Record`]:
//!
//! * **Encoder**: text line → [`split_fields`] → [`Record`] → [`codec::encode`] → frame
//! * **Projector**: frame → [`codec::decode`] → [`Record`] → selected fields as a text line
//!
//! A text-only fast path ([`project_text`]) splits and projects without ever
//! building a payload and produces byte-identical output to the binary path.
//!
//! ## Key Features
//!
//! * **No per-field allocation**: split offsets live in a reusable [`FieldRanges`] table
//! * **Zero-copy records**: fields borrow the line buffer or the frame buffer
//! * **Bounded reads**: frame length prefixes are checked before any buffer grows
//! * **Protobuf-compatible payloads**: field ordinal `i` is protobuf field `i + 1`
//! * **Fail fast**: the first malformed line or frame stops the run; output is flushed
//!
//! ## Quick Start
//!
//! ```rust
//! use rowframe::*;
//! use std::io::Cursor;
//!
//! fn main() -> Result<()> {
//!     let config = Config::<8>::default(); // comma, fields [2, 6], 5 MiB frames
//!
//!     let mut frames = Vec::new();
//!     encode_stream(Cursor::new("a,b,c,d,e,f,g,h\n"), &mut frames, &config)?;
//!
//!     let mut projected = Vec::new();
//!     project_frames(Cursor::new(frames), &mut projected, &config)?;
//!     assert_eq!(projected, b"c,g\n");
//!
//!     let mut fast = Vec::new();
//!     project_text(Cursor::new("a,b,c,d,e,f,g,h\n"), &mut fast, &config)?;
//!     assert_eq!(fast, projected);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! * **`Framer` / `Deframer`**: how payloads are delimited in the byte stream
//! * **`StreamWriter` / `StreamReader`**: generic record I/O over those strategies
//! * **`driver`**: the end-to-end pipelines used by the `rowframe` binary

pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod framing;
pub mod reader;
pub mod record;
pub mod split;
pub mod writer;

// Re-export the main public API for user convenience.
pub use config::{
    Config, FieldPolicy, Projection, DEFAULT_ARITY, DEFAULT_DELIMITER, DEFAULT_MAX_FRAME_LEN,
    DEFAULT_PROJECTION,
};
pub use driver::{
    encode_stream, project_frames, project_text, write_projection, FrameEncoder, LineReader,
    StreamStats,
};
pub use error::{Error, Result};
pub use framing::{read_frame, write_frame, DefaultDeframer, DefaultFramer, Deframer, Framer};
pub use reader::{Messages, StreamReader};
pub use record::{OwnedRecord, Record};
pub use split::{split_fields, FieldRanges};
pub use writer::StreamWriter;
