//! SSE parser shared by the web UI and the CLI job streams.
//!
//! # Design
//! - Accept partial chunks and emit complete SSE frames when a blank line is received.
//! - Raw network chunks may end inside a UTF-8 sequence; the incomplete tail is
//!   held back until the next chunk completes it.
//! - Decode JSON payloads into job status events; anything else is a decode error.

use crate::ReadStatusEvent;
use std::fmt;

/// Parsed SSE frame with decoded metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SseFrame {
    /// Optional event name.
    pub event: Option<String>,
    /// Optional event id.
    pub id: Option<String>,
    /// Concatenated data payload.
    pub data: String,
}

impl SseFrame {
    fn is_empty(&self) -> bool {
        self.event.is_none() && self.id.is_none() && self.data.is_empty()
    }
}

/// Incremental SSE parser for streamed chunks.
#[derive(Default)]
pub struct SseParser {
    pending: Vec<u8>,
    line: String,
    pending_cr: bool,
    builder: FrameBuilder,
}

impl SseParser {
    /// Feed a decoded chunk and collect every frame it completes.
    pub fn push(&mut self, chunk: &str) -> Vec<SseFrame> {
        let mut frames = Vec::new();
        for ch in chunk.chars() {
            if self.pending_cr {
                self.pending_cr = false;
                if ch == '\n' {
                    continue;
                }
            }
            match ch {
                '\n' => self.finish_line(&mut frames),
                '\r' => {
                    self.pending_cr = true;
                    self.finish_line(&mut frames);
                }
                _ => self.line.push(ch),
            }
        }
        frames
    }

    /// Feed a raw network chunk and collect every frame it completes.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.pending.extend_from_slice(chunk);
        let complete = match std::str::from_utf8(&self.pending) {
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            _ => self.pending.len(),
        };
        let tail = self.pending.split_off(complete);
        let ready = std::mem::replace(&mut self.pending, tail);
        self.push(&String::from_utf8_lossy(&ready))
    }

    /// Flush a trailing frame when the stream closes without a blank line.
    pub fn finish(&mut self) -> Option<SseFrame> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.line.push_str(&String::from_utf8_lossy(&rest));
        }
        if !self.line.is_empty() {
            self.finish_line(&mut Vec::new());
        }
        self.builder.take_frame()
    }

    fn finish_line(&mut self, frames: &mut Vec<SseFrame>) {
        let line = std::mem::take(&mut self.line);
        if line.is_empty() {
            if let Some(frame) = self.builder.take_frame() {
                frames.push(frame);
            }
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let (field, value) = line
            .split_once(':')
            .map_or((line.as_str(), ""), |(field, value)| {
                (field, value.strip_prefix(' ').unwrap_or(value))
            });
        self.builder.apply_field(field, value);
    }
}

/// Decode failures produced by SSE payload parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SseDecodeError {
    /// Optional event name for the frame.
    pub event: Option<String>,
    /// Raw payload data.
    pub data: String,
}

impl fmt::Display for SseDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.event {
            Some(event) => write!(f, "undecodable '{event}' event: {}", self.data),
            None => write!(f, "undecodable event: {}", self.data),
        }
    }
}

/// Decode an SSE frame into a job status event.
///
/// # Errors
/// Returns [`SseDecodeError`] when the payload is empty or not a status object.
pub fn decode_status(frame: &SseFrame) -> Result<ReadStatusEvent, SseDecodeError> {
    let data = frame.data.trim();
    if data.is_empty() {
        return Err(SseDecodeError {
            event: frame.event.clone(),
            data: String::new(),
        });
    }
    serde_json::from_str::<ReadStatusEvent>(data).map_err(|_| SseDecodeError {
        event: frame.event.clone(),
        data: frame.data.clone(),
    })
}

#[derive(Default)]
struct FrameBuilder {
    event: Option<String>,
    id: Option<String>,
    data: String,
}

impl FrameBuilder {
    fn apply_field(&mut self, field: &str, value: &str) {
        match field {
            "event" => self.event = Some(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            "data" => {
                if !self.data.is_empty() {
                    self.data.push('\n');
                }
                self.data.push_str(value);
            }
            _ => {}
        }
    }

    fn take_frame(&mut self) -> Option<SseFrame> {
        let frame = SseFrame {
            event: self.event.take(),
            id: self.id.take(),
            data: std::mem::take(&mut self.data),
        };
        if frame.is_empty() { None } else { Some(frame) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_emits_frames_on_blank_lines() {
        let mut parser = SseParser::default();
        let input = "event: status\ndata: {\"status\":\"Processing post A\"}\n\nid: 2\ndata: {\"status\":\"Completed PDF generation\"}\n\n";
        let frames = parser.push(input);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].event.as_deref(), Some("status"));
        assert_eq!(frames[1].id.as_deref(), Some("2"));
    }

    #[test]
    fn parser_handles_split_chunks_and_crlf() {
        let mut parser = SseParser::default();
        assert!(parser.push("data:{\"status\":\"Proc").is_empty());
        let frames = parser.push("essing\"}\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "{\"status\":\"Processing\"}");
    }

    #[test]
    fn parser_skips_comments_and_joins_data_lines() {
        let mut parser = SseParser::default();
        let frames = parser.push(": keep-alive\ndata: line1\ndata: line2\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "line1\nline2");
    }

    #[test]
    fn finish_flushes_unterminated_frame() {
        let mut parser = SseParser::default();
        assert!(parser.push("data: {\"status\":\"Completed\"}").is_empty());
        let frame = parser.finish();
        assert_eq!(
            frame.map(|frame| frame.data),
            Some("{\"status\":\"Completed\"}".to_string())
        );
        assert!(parser.finish().is_none());
    }

    #[test]
    fn push_bytes_keeps_characters_split_across_chunks() -> Result<(), SseDecodeError> {
        let payload = "data: {\"status\":\"Processing post Café à Zürich\"}\n\n".as_bytes();
        let split = payload
            .iter()
            .position(|byte| *byte == 0xC3)
            .map_or(payload.len(), |index| index + 1);
        let mut parser = SseParser::default();
        assert!(parser.push_bytes(&payload[..split]).is_empty());
        let frames = parser.push_bytes(&payload[split..]);
        assert_eq!(frames.len(), 1);
        assert_eq!(decode_status(&frames[0])?.status, "Processing post Café à Zürich");
        Ok(())
    }

    #[test]
    fn push_bytes_survives_byte_at_a_time_delivery() {
        let payload = "data: {\"status\":\"Traitement de l’été\"}\n\n".as_bytes();
        let mut parser = SseParser::default();
        let frames: Vec<SseFrame> = payload
            .iter()
            .flat_map(|byte| parser.push_bytes(std::slice::from_ref(byte)))
            .collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "{\"status\":\"Traitement de l’été\"}");
    }

    #[test]
    fn push_bytes_replaces_invalid_sequences() {
        let mut parser = SseParser::default();
        let frames = parser.push_bytes(b"data: a\xFFb\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "a\u{FFFD}b");
    }

    #[test]
    fn decode_status_reads_completion() -> Result<(), SseDecodeError> {
        let frame = SseFrame {
            event: None,
            id: None,
            data: "{\"status\":\"Completed blog download, retrieved 1 posts\"}".into(),
        };
        assert!(decode_status(&frame)?.is_completed());
        Ok(())
    }

    #[test]
    fn decode_status_rejects_non_status_payloads() {
        let frame = SseFrame {
            event: Some("ping".into()),
            id: None,
            data: "hello".into(),
        };
        let err = decode_status(&frame);
        assert_eq!(
            err,
            Err(SseDecodeError {
                event: Some("ping".into()),
                data: "hello".into(),
            })
        );
        let empty = SseFrame {
            event: None,
            id: None,
            data: "  ".into(),
        };
        assert!(decode_status(&empty).is_err());
    }
}
