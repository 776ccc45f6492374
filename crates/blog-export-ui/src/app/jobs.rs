//! Job stream runner for download and PDF generation progress.
//!
//! # Design
//! - Use fetch streaming so the session cookie rides along and the stream can be aborted.
//! - Requests run in CORS mode so an overridden API base behaves like the REST calls.
//! - Raw bytes go straight to the shared parser, which reassembles split UTF-8 sequences.
//! - One stream per job; no reconnects. A stream that ends without a completed
//!   status is reported as a failure.
//! - Stop reading as soon as a completed status is delivered.

use crate::features::jobs::state::JobUpdate;
use blog_export_api_models::sse::{SseFrame, SseParser, decode_status};
use gloo::console;
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AbortController, AbortSignal, Headers, ReadableStream, ReadableStreamDefaultReader, Request,
    RequestCredentials, RequestInit, RequestMode, Response,
};
use yew::Callback;

/// Active job stream handle for cancellation.
pub(crate) struct JobHandle {
    controller: AbortController,
}

impl JobHandle {
    pub(crate) fn close(&self) {
        self.controller.abort();
    }
}

impl Drop for JobHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Open a job stream and forward its updates until completion, failure or abort.
pub(crate) fn start_job(url: String, on_update: Callback<JobUpdate>) -> Option<JobHandle> {
    let controller = AbortController::new().ok()?;
    let signal = controller.signal();
    yew::platform::spawn_local(async move {
        if let Err(err) = run_job(&url, &signal, &on_update).await {
            if !signal.aborted() {
                on_update.emit(JobUpdate::Failed(err.to_string()));
            }
        }
    });
    Some(JobHandle { controller })
}

async fn run_job(
    url: &str,
    signal: &AbortSignal,
    on_update: &Callback<JobUpdate>,
) -> Result<(), StreamError> {
    let response = fetch_stream(url, signal).await?;
    let mut reader = stream_reader(&response)?;
    let mut parser = SseParser::default();
    loop {
        if signal.aborted() {
            return Ok(());
        }
        if let Some(bytes) = read_chunk(&mut reader).await? {
            for frame in parser.push_bytes(&bytes.to_vec()) {
                if forward(&frame, on_update) {
                    let _ = reader.cancel();
                    return Ok(());
                }
            }
        } else {
            if let Some(frame) = parser.finish() {
                if forward(&frame, on_update) {
                    return Ok(());
                }
            }
            return Err(StreamError::Ended);
        }
    }
}

/// Emit a decoded status; returns whether it finished the job.
fn forward(frame: &SseFrame, on_update: &Callback<JobUpdate>) -> bool {
    match decode_status(frame) {
        Ok(event) => {
            let completed = event.is_completed();
            on_update.emit(JobUpdate::Status(event));
            completed
        }
        Err(err) => {
            console::warn!(format!("skipping job event: {err}"));
            false
        }
    }
}

async fn fetch_stream(url: &str, signal: &AbortSignal) -> Result<Response, StreamError> {
    let window = web_sys::window().ok_or(StreamError::Window)?;
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);
    init.set_credentials(RequestCredentials::SameOrigin);
    init.set_signal(Some(signal));

    let headers = Headers::new().map_err(|_| StreamError::Request)?;
    if let Err(err) = headers.set("Accept", "text/event-stream") {
        console::error!("request header set failed", err);
    }
    init.set_headers(&headers);

    let request = Request::new_with_str_and_init(url, &init).map_err(|_| StreamError::Request)?;
    let resp = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| StreamError::Fetch)?;
    let response: Response = resp.dyn_into().map_err(|_| StreamError::Fetch)?;
    if !response.ok() {
        return Err(StreamError::Status(response.status()));
    }
    Ok(response)
}

fn stream_reader(response: &Response) -> Result<ReadableStreamDefaultReader, StreamError> {
    let stream: ReadableStream = response.body().ok_or(StreamError::Body)?;
    stream
        .get_reader()
        .dyn_into::<ReadableStreamDefaultReader>()
        .map_err(|_| StreamError::Body)
}

async fn read_chunk(
    reader: &mut ReadableStreamDefaultReader,
) -> Result<Option<Uint8Array>, StreamError> {
    let chunk = JsFuture::from(reader.read())
        .await
        .map_err(|_| StreamError::Read)?;
    let done = Reflect::get(&chunk, &JsValue::from_str("done"))
        .map_err(|_| StreamError::Read)?
        .as_bool()
        .unwrap_or(false);
    if done {
        return Ok(None);
    }
    let value = Reflect::get(&chunk, &JsValue::from_str("value")).map_err(|_| StreamError::Read)?;
    Ok(Some(Uint8Array::new(&value)))
}

#[derive(Debug)]
enum StreamError {
    Window,
    Request,
    Fetch,
    Status(u16),
    Body,
    Read,
    Ended,
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Window => write!(f, "window unavailable"),
            Self::Request => write!(f, "request build failed"),
            Self::Fetch => write!(f, "fetch failed"),
            Self::Status(code) => write!(f, "http {code}"),
            Self::Body => write!(f, "stream body unavailable"),
            Self::Read => write!(f, "stream read failed"),
            Self::Ended => write!(f, "stream ended before completion"),
        }
    }
}
