//! Command-line argument parsing for the streamframer binary.

use std::path::PathBuf;

/// Usage text printed by `--help` and on invalid arguments.
pub const USAGE: &str = "\
Usage: streamframer [OPTIONS] <URL | -f FILE | ->

Reads an SSE-style stream and prints every event as one JSON line.

Options:
  --trace-id ID    Trace id attached to every event (default: random UUID)
  --post BODY      POST BODY (JSON) to URL instead of GET
  -f, --file FILE  Read the stream from FILE
  -                Read the stream from stdin
  -V, --version    Print version
  -h, --help       Print this help

Environment:
  STREAMFRAMER_MAX_BUFFER_BYTES  Limit on unterminated frame size
  STREAMFRAMER_TIMEOUT_SECS      Connect timeout for URLs
  RUST_LOG                       Log filter (logs go to stderr)";

/// Where the byte stream comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Url(String),
    File(PathBuf),
    Stdin,
}

/// Options for streaming a source.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamOptions {
    pub source: Source,
    pub trace_id: Option<String>,
    /// JSON body; switches URL sources from GET to POST
    pub post_body: Option<String>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Stream a source and print its events
    Stream(StreamOptions),
    /// Arguments could not be parsed
    Invalid(String),
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use streamframer::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["streamframer".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut source: Option<Source> = None;
    let mut trace_id = None;
    let mut post_body = None;

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        let next_source = match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--trace-id" => match args.next() {
                Some(value) => {
                    trace_id = Some(value);
                    continue;
                }
                None => return CliCommand::Invalid("--trace-id needs a value".to_string()),
            },
            "--post" => match args.next() {
                Some(value) => {
                    post_body = Some(value);
                    continue;
                }
                None => return CliCommand::Invalid("--post needs a value".to_string()),
            },
            "-f" | "--file" => match args.next() {
                Some(path) => Source::File(PathBuf::from(path)),
                None => return CliCommand::Invalid(format!("{} needs a path", arg)),
            },
            "-" => Source::Stdin,
            flag if flag.starts_with('-') => {
                return CliCommand::Invalid(format!("Unknown option: {}", flag))
            }
            url => Source::Url(url.to_string()),
        };

        if source.is_some() {
            return CliCommand::Invalid("Only one input source can be given".to_string());
        }
        source = Some(next_source);
    }

    let Some(source) = source else {
        return CliCommand::Invalid("No input source given".to_string());
    };
    if post_body.is_some() && !matches!(source, Source::Url(_)) {
        return CliCommand::Invalid("--post only applies to URL sources".to_string());
    }

    CliCommand::Stream(StreamOptions {
        source,
        trace_id,
        post_body,
    })
}
