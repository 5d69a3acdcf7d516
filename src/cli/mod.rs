//! CLI module for streamframer.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - The stream command, which frames one source and prints its events
//!
//! # Usage
//!
//! ```ignore
//! use streamframer::cli::{parse_args, run_stream, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Stream(options) => {
//!         let summary = run_stream(&options, &config, &mut std::io::stdout(), shutdown).await?;
//!     }
//!     _ => {}
//! }
//! ```

pub mod args;
pub mod stream;
pub mod version;

pub use args::{parse_args, CliCommand, Source, StreamOptions, USAGE};
pub use stream::{run_stream, StreamSummary};
pub use version::{handle_version_command, VERSION};
