//! Incremental decoding of a newline-delimited JSON byte stream.

use encoding_rs::{CoderResult, Decoder, UTF_8};

use crate::WireEvent;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed event line {line:?}: {message}")]
pub struct LineError {
    pub line: String,
    pub message: String,
}

pub type LineResult = Result<WireEvent, LineError>;

/// Parse one complete line as an event.
pub fn parse_line(line: &str) -> LineResult {
    serde_json::from_str(line).map_err(|err| LineError {
        line: line.to_string(),
        message: err.to_string(),
    })
}

/// Turns arbitrary byte chunks into parsed lines.
///
/// Bytes go through a streaming UTF-8 decoder, so a character split across
/// two chunks is decoded once both halves have arrived. Text after the last
/// newline stays pending until the next chunk.
pub struct NdjsonDecoder {
    decoder: Decoder,
    pending: String,
}

impl Default for NdjsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder(),
            pending: String::new(),
        }
    }

    /// Decode a chunk and return every line it completed, blank lines excluded.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<LineResult> {
        self.decode(chunk, false);
        self.drain_complete_lines()
    }

    /// Text currently waiting for its newline.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Flush the byte decoder and hand back the unterminated fragment, if it
    /// holds anything besides whitespace.
    pub fn finish(mut self) -> Option<String> {
        self.decode(&[], true);
        let tail = std::mem::take(&mut self.pending);
        if tail.trim().is_empty() {
            None
        } else {
            Some(tail)
        }
    }

    fn decode(&mut self, mut bytes: &[u8], last: bool) {
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(bytes.len())
                .unwrap_or(bytes.len());
            self.pending.reserve(needed.max(4));
            let (result, read, _had_replacements) =
                self.decoder
                    .decode_to_string(bytes, &mut self.pending, last);
            bytes = &bytes[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }

    fn drain_complete_lines(&mut self) -> Vec<LineResult> {
        let Some(last_newline) = self.pending.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(parse_line)
            .collect()
    }
}
