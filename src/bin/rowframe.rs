//! Command-line wrapper around the rowframe pipelines.
//!
//! ```text
//! rowframe encode  [--delimiter C] [--lenient] [--max-frame-len BYTES] [--verbose]
//! rowframe project [--from frames|text] [--fields 2,6] [--delimiter C] [--lenient]
//!                  [--max-frame-len BYTES] [--verbose]
//! ```
//!
//! Reads standard input, writes standard output, logs to standard error.

use anyhow::{anyhow, bail, Context};
use rowframe::{
    encode_stream, project_frames, project_text, Config, FieldPolicy, Projection, DEFAULT_ARITY,
    DEFAULT_DELIMITER, DEFAULT_MAX_FRAME_LEN, DEFAULT_PROJECTION,
};
use std::io::{BufReader, BufWriter};
use tracing::Level;

const IO_BUFFER_SIZE: usize = 512 * 1024;

const USAGE: &str = "\
usage: rowframe encode  [--delimiter C] [--lenient] [--max-frame-len BYTES] [--verbose]
       rowframe project [--from frames|text] [--fields 2,6] [--delimiter C] [--lenient]
                        [--max-frame-len BYTES] [--verbose]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Encode,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Frames,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    mode: Mode,
    source: Source,
    delimiter: u8,
    policy: FieldPolicy,
    max_frame_len: usize,
    fields: Vec<usize>,
    verbose: bool,
}

fn parse_delimiter(value: &str) -> anyhow::Result<u8> {
    match value {
        "\\t" | "tab" => Ok(b'\t'),
        _ if value.len() == 1 => Ok(value.as_bytes()[0]),
        _ => bail!("delimiter must be a single byte, got {value:?}"),
    }
}

fn parse_fields(value: &str) -> anyhow::Result<Vec<usize>> {
    value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid field ordinal {part:?}"))
        })
        .collect()
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Args> {
    let mut args = args.into_iter();
    let mode = match args.next().as_deref() {
        Some("encode") => Mode::Encode,
        Some("project") => Mode::Project,
        Some(other) => bail!("unknown mode {other:?}\n{USAGE}"),
        None => bail!("missing mode\n{USAGE}"),
    };

    let mut parsed = Args {
        mode,
        source: Source::Frames,
        delimiter: DEFAULT_DELIMITER,
        policy: FieldPolicy::Strict,
        max_frame_len: DEFAULT_MAX_FRAME_LEN,
        fields: DEFAULT_PROJECTION.to_vec(),
        verbose: false,
    };

    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| anyhow!("{flag} requires a value"));
        match flag.as_str() {
            "--delimiter" => parsed.delimiter = parse_delimiter(&value()?)?,
            "--max-frame-len" => {
                parsed.max_frame_len = value()?.parse().context("invalid --max-frame-len")?
            }
            "--lenient" => parsed.policy = FieldPolicy::Lenient,
            "--verbose" | "-v" => parsed.verbose = true,
            "--from" if mode == Mode::Project => {
                parsed.source = match value()?.as_str() {
                    "frames" => Source::Frames,
                    "text" => Source::Text,
                    other => bail!("--from expects frames or text, got {other:?}"),
                }
            }
            "--fields" if mode == Mode::Project => parsed.fields = parse_fields(&value()?)?,
            _ => bail!("unexpected argument {flag:?}\n{USAGE}"),
        }
    }
    Ok(parsed)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    init_logging(args.verbose);

    let config = Config::<DEFAULT_ARITY>::default()
        .with_delimiter(args.delimiter)
        .with_field_policy(args.policy)
        .with_max_frame_len(args.max_frame_len)
        .with_projection(Projection::new(args.fields.clone()));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let input = BufReader::with_capacity(IO_BUFFER_SIZE, stdin.lock());
    let mut output = BufWriter::with_capacity(IO_BUFFER_SIZE, stdout.lock());

    let stats = match (args.mode, args.source) {
        (Mode::Encode, _) => encode_stream(input, &mut output, &config).context("encode failed")?,
        (Mode::Project, Source::Frames) => {
            project_frames(input, &mut output, &config).context("projection failed")?
        }
        (Mode::Project, Source::Text) => {
            project_text(input, &mut output, &config).context("projection failed")?
        }
    };

    tracing::info!(
        records = stats.records,
        blank_lines = stats.blank_lines,
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> anyhow::Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_encode_defaults() {
        let parsed = args(&["encode"]).unwrap();
        assert_eq!(parsed.mode, Mode::Encode);
        assert_eq!(parsed.delimiter, b',');
        assert_eq!(parsed.policy, FieldPolicy::Strict);
        assert_eq!(parsed.max_frame_len, 5 * 1024 * 1024);
        assert_eq!(parsed.fields, vec![2, 6]);
    }

    #[test]
    fn test_project_options() {
        let parsed = args(&[
            "project", "--from", "text", "--fields", "0, 7", "--delimiter", "tab", "--lenient",
            "-v",
        ])
        .unwrap();
        assert_eq!(parsed.source, Source::Text);
        assert_eq!(parsed.fields, vec![0, 7]);
        assert_eq!(parsed.delimiter, b'\t');
        assert_eq!(parsed.policy, FieldPolicy::Lenient);
        assert!(parsed.verbose);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(args(&[]).is_err());
        assert!(args(&["decode"]).is_err());
        assert!(args(&["encode", "--fields", "1,2"]).is_err());
        assert!(args(&["project", "--from", "json"]).is_err());
        assert!(args(&["project", "--delimiter", "::"]).is_err());
        assert!(args(&["project", "--fields", "2,x"]).is_err());
        assert!(args(&["encode", "--max-frame-len"]).is_err());
    }
}
