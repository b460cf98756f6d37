//! HTTP GET transport.
//!
//! A [`Transport`] pushes the response into a [`BodySink`]: first the
//! final-hop [`ResponseHead`], then body chunks. The sink can stop the
//! transfer at any point, which is how a payload gets rejected after its
//! first few kilobytes without reading the rest.

mod easy;
mod headers;

pub use easy::CurlTransport;
pub use headers::{parse_status_line, HeaderBlock};

use crate::retry::FetchError;

/// Status and declared type of the final response after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u32,
    /// Raw `Content-Type` value, if the server sent one.
    pub content_type: Option<String>,
}

/// Returned by sink callbacks to continue or abort the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    Stop,
}

/// Receives one response. `on_head` is called exactly once, before any chunk.
pub trait BodySink {
    fn on_head(&mut self, head: &ResponseHead) -> SinkControl;
    fn on_chunk(&mut self, chunk: &[u8]) -> SinkControl;
}

/// What the transport observed for one request.
#[derive(Debug, Clone)]
pub struct TransferReport {
    pub head: ResponseHead,
    /// True when the sink stopped the transfer early.
    pub stopped: bool,
}

/// Performs a single GET, following redirects. No retries at this level.
pub trait Transport {
    fn get(&mut self, url: &str, sink: &mut dyn BodySink) -> Result<TransferReport, FetchError>;
}

/// Collects a small body in memory (JSON lookups). Stops past `limit` bytes.
#[derive(Debug)]
pub struct MemorySink {
    limit: usize,
    body: Vec<u8>,
    truncated: bool,
}

impl MemorySink {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            body: Vec::new(),
            truncated: false,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl BodySink for MemorySink {
    fn on_head(&mut self, _head: &ResponseHead) -> SinkControl {
        SinkControl::Continue
    }

    fn on_chunk(&mut self, chunk: &[u8]) -> SinkControl {
        if self.body.len() + chunk.len() > self.limit {
            self.truncated = true;
            return SinkControl::Stop;
        }
        self.body.extend_from_slice(chunk);
        SinkControl::Continue
    }
}
