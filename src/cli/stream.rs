//! The stream command: frame one source and print its events as JSON lines.

use std::future::Future;
use std::io::Write;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use super::args::{Source, StreamOptions};
use crate::client::SearchStreamClient;
use crate::config::FramerConfig;
use crate::events::{ErrorPayload, StreamEvent};
use crate::framer::{EventReceiver, StreamFramer};
use crate::traits::{ByteStream, HttpError};

/// What happened while streaming one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamSummary {
    /// Trace id the events were tagged with
    pub trace_id: String,
    /// Number of events printed, including the terminal one
    pub events: usize,
    /// Payload of the fatal error that ended the stream, if any
    pub fatal: Option<ErrorPayload>,
    /// The shutdown signal fired before the stream finished
    pub interrupted: bool,
}

/// Wrap any async reader as a chunk stream.
pub fn reader_stream<R>(reader: R) -> ByteStream
where
    R: AsyncRead + Send + 'static,
{
    Box::pin(ReaderStream::new(reader).map(|chunk| chunk.map_err(|e| HttpError::Io(e.to_string()))))
}

/// Open `path` as a chunk stream.
pub async fn file_stream(path: &Path) -> Result<ByteStream> {
    let file = tokio::fs::File::open(path)
        .await
        .wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    Ok(reader_stream(file))
}

/// Frame the source named by `options`, writing each event to `out` as one
/// JSON line until the stream ends or `shutdown` resolves.
///
/// Failing to open the source is an error; a fatal error event is not, it
/// is reported in the returned summary.
pub async fn run_stream<W, F>(
    options: &StreamOptions,
    config: &FramerConfig,
    out: &mut W,
    shutdown: F,
) -> Result<StreamSummary>
where
    W: Write,
    F: Future<Output = ()>,
{
    let trace_id = options
        .trace_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let (framer, mut events) = StreamFramer::new(config.clone());

    match &options.source {
        Source::Url(url) => {
            let client = SearchStreamClient::from_config(config)?;
            match &options.post_body {
                Some(body) => {
                    let body: serde_json::Value =
                        serde_json::from_str(body).wrap_err("--post body is not valid JSON")?;
                    client.start_search(&framer, &trace_id, url, &body).await?;
                }
                None => client.start_get(&framer, &trace_id, url).await?,
            }
        }
        Source::File(path) => framer.start(trace_id.as_str(), file_stream(path).await?)?,
        Source::Stdin => framer.start(trace_id.as_str(), reader_stream(tokio::io::stdin()))?,
    }
    tracing::info!("Streaming {:?} as {}", options.source, trace_id);

    print_events(&framer, &mut events, &trace_id, out, shutdown).await
}

/// Write events of `trace_id` to `out` until its terminal event arrives or
/// `shutdown` resolves, in which case the session is cancelled.
async fn print_events<W, F>(
    framer: &StreamFramer,
    events: &mut EventReceiver,
    trace_id: &str,
    out: &mut W,
    shutdown: F,
) -> Result<StreamSummary>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut summary = StreamSummary {
        trace_id: trace_id.to_string(),
        ..Default::default()
    };
    tokio::pin!(shutdown);

    loop {
        let event = tokio::select! {
            event = events.recv() => event,
            _ = &mut shutdown => {
                framer.cancel(trace_id);
                summary.interrupted = true;
                break;
            }
        };
        let Some(event) = event else {
            break;
        };

        serde_json::to_writer(&mut *out, &event)?;
        writeln!(out)?;
        summary.events += 1;

        match event {
            StreamEvent::End { .. } => break,
            StreamEvent::Error {
                error, fatal: true, ..
            } => {
                summary.fatal = Some(error);
                break;
            }
            _ => {}
        }
    }

    out.flush()?;
    Ok(summary)
}
