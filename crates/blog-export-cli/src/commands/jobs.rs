use anyhow::anyhow;
use blog_export_api_models::sse::{SseFrame, SseParser, decode_status};
use blog_export_api_models::{DateRange, JobKind, ReadStatusEvent, paths};
use futures_util::StreamExt;

use crate::cli::{BlogArgs, GenerateArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult, classify_problem};
use crate::commands::blogs::require_id;
use crate::output::{emit, format_status};

pub(crate) async fn handle_download(
    ctx: &AppContext,
    args: BlogArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let id = require_id(&args.id)?;
    run_job(ctx, JobKind::Download, &paths::download(id), format).await
}

pub(crate) async fn handle_generate(
    ctx: &AppContext,
    args: GenerateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let id = require_id(&args.id)?;
    let range = DateRange::parse(&args.from, &args.to)
        .map_err(|err| CliError::validation(err.to_string()))?;
    run_job(ctx, JobKind::GeneratePdf, &paths::generate(id, &range), format).await
}

async fn run_job(
    ctx: &AppContext,
    kind: JobKind,
    path: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let response = ctx
        .stream(path)?
        .send()
        .await
        .map_err(|err| job_failed(kind, format!("stream connection failed: {err}")))?;
    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }
    tracing::info!(job = kind.as_str(), path, "job stream opened");

    let mut stream = response.bytes_stream();
    let mut reader = StatusReader::default();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| job_failed(kind, format!("stream read failed: {err}")))?;
        for event in reader.push(&chunk) {
            emit(&format_status(kind, &event, format)?)?;
            if event.is_completed() {
                tracing::info!(job = kind.as_str(), status = %event.status, "job completed");
                return Ok(());
            }
        }
    }
    if let Some(event) = reader.finish() {
        emit(&format_status(kind, &event, format)?)?;
        if event.is_completed() {
            return Ok(());
        }
    }
    Err(job_failed(kind, "stream ended before completion".to_string()))
}

fn job_failed(kind: JobKind, detail: String) -> CliError {
    tracing::error!(job = kind.as_str(), "{}: {detail}", kind.failure_label());
    CliError::failure(anyhow!("{}: {detail}", kind.failure_label()))
}

/// Event-stream reader yielding decoded status events from raw body chunks.
#[derive(Default)]
pub(crate) struct StatusReader {
    parser: SseParser,
}

impl StatusReader {
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<ReadStatusEvent> {
        self.parser
            .push_bytes(chunk)
            .iter()
            .filter_map(decode)
            .collect()
    }

    pub(crate) fn finish(&mut self) -> Option<ReadStatusEvent> {
        self.parser.finish().as_ref().and_then(decode)
    }
}

fn decode(frame: &SseFrame) -> Option<ReadStatusEvent> {
    match decode_status(frame) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!(error = %err, "discarding malformed status event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::context_with;
    use httpmock::prelude::*;

    #[test]
    fn reader_handles_split_frames_and_comments() {
        let mut reader = StatusReader::default();
        assert!(reader.push(b": ping\ndata: {\"status\":\"Proc").is_empty());
        let events = reader.push(b"essing\"}\r\n\r\ndata:{\"status\":\"Completed\"}\n\n");
        let statuses: Vec<&str> = events.iter().map(|e| e.status.as_str()).collect();
        assert_eq!(statuses, ["Processing", "Completed"]);
        assert!(reader.finish().is_none());
    }

    #[test]
    fn reader_skips_malformed_payloads() {
        let mut reader = StatusReader::default();
        let events = reader.push(b"data: not json\n\ndata: {\"status\":\"ok\"}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, "ok");
    }

    #[test]
    fn finish_flushes_unterminated_event() {
        let mut reader = StatusReader::default();
        assert!(reader.push(b"data: {\"status\":\"Completed PDF\"}").is_empty());
        assert_eq!(
            reader.finish().map(|event| event.status),
            Some("Completed PDF".to_string())
        );
    }

    #[test]
    fn reader_keeps_non_ascii_titles_split_across_chunks() {
        let body = "data: {\"status\":\"Processing post Café\"}\n\n".as_bytes();
        let split = body.len() - "\"}\n\n".len() - 1;
        let mut reader = StatusReader::default();
        assert!(reader.push(&body[..split]).is_empty());
        let events = reader.push(&body[split..]);
        let statuses: Vec<&str> = events.iter().map(|e| e.status.as_str()).collect();
        assert_eq!(statuses, ["Processing post Café"]);
    }

    #[tokio::test]
    async fn download_succeeds_on_completed_status() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/blog-export/download/b1")
                .header("accept", "text/event-stream");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(concat!(
                    "data:{\"status\":\"Processing post Day 1\"}\n\n",
                    "data:{\"status\":\"Completed blog download, retrieved 1 posts\"}\n\n",
                ));
        });

        let ctx = context_with(&server);
        handle_download(&ctx, BlogArgs { id: "b1".into() }, OutputFormat::Table)
            .await
            .expect("download should complete");
        mock.assert();
    }

    #[tokio::test]
    async fn download_fails_when_stream_ends_early() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/blog-export/download/b1");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body("data:{\"status\":\"Processing post Day 1\"}\n\n");
        });

        let ctx = context_with(&server);
        let err = handle_download(&ctx, BlogArgs { id: "b1".into() }, OutputFormat::Json)
            .await
            .expect_err("incomplete stream should fail");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().starts_with("Failed downloading blog"));
    }

    #[tokio::test]
    async fn generate_sends_date_range() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/blog-export/generate/b1")
                .query_param("fromDate", "2017-01-01")
                .query_param("toDate", "2017-03-31");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body("data:{\"status\":\"Completed PDF generation\"}\n\n");
        });

        let ctx = context_with(&server);
        let args = GenerateArgs {
            id: "b1".into(),
            from: "2017-01-01".into(),
            to: "2017-03-31".into(),
        };
        handle_generate(&ctx, args, OutputFormat::Table)
            .await
            .expect("generation should complete");
        mock.assert();
    }

    #[tokio::test]
    async fn generate_rejects_inverted_range_without_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/blog-export/generate/b1");
            then.status(200);
        });

        let ctx = context_with(&server);
        let args = GenerateArgs {
            id: "b1".into(),
            from: "2017-05-01".into(),
            to: "2017-01-01".into(),
        };
        let err = handle_generate(&ctx, args, OutputFormat::Table)
            .await
            .expect_err("inverted range should fail");
        assert_eq!(err.exit_code(), 2);
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn generate_failure_status_is_reported() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/blog-export/generate/b1");
            then.status(500).body("renderer crashed");
        });

        let ctx = context_with(&server);
        let args = GenerateArgs {
            id: "b1".into(),
            from: "2017-01-01".into(),
            to: "2017-01-02".into(),
        };
        let err = handle_generate(&ctx, args, OutputFormat::Table)
            .await
            .expect_err("server error should fail");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("renderer crashed"));
    }
}
