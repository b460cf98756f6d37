//! libcurl transport: one easy handle per request, streamed into a sink.

use std::cell::RefCell;
use std::str;
use std::time::Duration;

use super::headers::HeaderBlock;
use super::{BodySink, SinkControl, Transport, TransferReport};
use crate::config::HttpConfig;
use crate::retry::FetchError;

const MAX_REDIRECTS: u32 = 10;

/// Blocking GET over libcurl with redirect following and bounded timeouts.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: Option<String>,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
            user_agent: None,
        }
    }

    pub fn from_config(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        if let Some(agent) = &self.user_agent {
            easy.useragent(agent)?;
        }
        Ok(easy)
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

struct SinkState<'a> {
    sink: &'a mut dyn BodySink,
    head_sent: bool,
    stopped: bool,
}

impl Transport for CurlTransport {
    fn get(&mut self, url: &str, sink: &mut dyn BodySink) -> Result<TransferReport, FetchError> {
        let mut easy = self.easy(url)?;
        let headers = RefCell::new(HeaderBlock::default());
        let state = RefCell::new(SinkState {
            sink,
            head_sent: false,
            stopped: false,
        });

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    headers.borrow_mut().push_line(line);
                }
                true
            })?;
            transfer.write_function(|data| {
                let mut st = state.borrow_mut();
                if !st.head_sent {
                    st.head_sent = true;
                    let head = headers.borrow().head();
                    if st.sink.on_head(&head) == SinkControl::Stop {
                        st.stopped = true;
                        return Ok(0); // abort transfer
                    }
                }
                match st.sink.on_chunk(data) {
                    SinkControl::Continue => Ok(data.len()),
                    SinkControl::Stop => {
                        st.stopped = true;
                        Ok(0)
                    }
                }
            })?;
            transfer.perform()
        };

        let SinkState {
            sink,
            head_sent,
            mut stopped,
        } = state.into_inner();
        match performed {
            Ok(()) => {}
            Err(e) if stopped && e.is_write_error() => {}
            Err(e) => return Err(e.into()),
        }

        let mut head = headers.into_inner().head();
        head.status = easy.response_code()?;
        if !head_sent && sink.on_head(&head) == SinkControl::Stop {
            stopped = true;
        }
        tracing::debug!(url, status = head.status, stopped, "GET finished");
        Ok(TransferReport { head, stopped })
    }
}
