//! Response header accumulation across redirect hops.

use super::ResponseHead;

/// Parses the status code out of an HTTP status line
/// (`HTTP/1.1 200 OK`, `HTTP/2 301`).
pub fn parse_status_line(line: &str) -> Option<u32> {
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Header state of the most recent response. A new status line starts a
/// new hop and clears what the previous hop declared.
#[derive(Debug, Default, Clone)]
pub struct HeaderBlock {
    status: Option<u32>,
    content_type: Option<String>,
}

impl HeaderBlock {
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if let Some(code) = parse_status_line(line) {
            self.status = Some(code);
            self.content_type = None;
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                let value = value.trim();
                if !value.is_empty() {
                    self.content_type = Some(value.to_string());
                }
            }
        }
    }

    pub fn head(&self) -> ResponseHead {
        ResponseHead {
            status: self.status.unwrap_or(0),
            content_type: self.content_type.clone(),
        }
    }
}
