use std::error::Error;
use std::io;
use std::time::Duration;

use ureq::{Agent, AgentBuilder, ErrorKind};

use super::{Body, Fetcher, Response};

/// Applies to the whole request; there is no separate connect or read timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct UreqFetcher {
    agent: Agent,
}

impl Fetcher for UreqFetcher {
    fn fetch(&self, url: &str) -> Response {
        let response = self.agent.request("GET", url).call();

        match response {
            Ok(response) => {
                let content_type = response.header("Content-Type").map(str::to_string);

                let content_length = response
                    .header("Content-Length")
                    .and_then(|value| value.parse::<u64>().ok());

                Response::ok(Body::new(
                    content_type,
                    content_length,
                    Box::new(response.into_reader()),
                ))
            }

            Err(ureq::Error::Status(code, _)) => Response::status(code),

            Err(ureq::Error::Transport(transport)) => match transport.kind() {
                ErrorKind::Dns | ErrorKind::ConnectionFailed => Response::connection_failed(),
                ErrorKind::Io if is_timeout(&transport) => Response::timed_out(),
                _ => Response::transport(transport.to_string()),
            },
        }
    }
}

/// ureq surfaces an elapsed agent timeout as an Io transport error wrapping
/// a TimedOut/WouldBlock io error somewhere down the source chain.
fn is_timeout(transport: &ureq::Transport) -> bool {
    let mut source = transport.source();

    while let Some(inner) = source {
        if let Some(io_error) = inner.downcast_ref::<io::Error>() {
            return matches!(
                io_error.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            );
        }

        source = inner.source();
    }

    false
}

impl UreqFetcher {
    pub fn new() -> Self {
        let agent = AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();

        UreqFetcher { agent }
    }
}

impl Default for UreqFetcher {
    fn default() -> Self {
        Self::new()
    }
}
