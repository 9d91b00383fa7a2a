//! HTTP transport backed by `ureq`.

use log::debug;

use super::{FetchError, Response, Transport};

/// Blocking HTTP(S) transport.
///
/// Redirects are followed by the agent; deadlines and proxies are configured
/// on the `ureq::Agent` passed to [`HttpTransport::with_agent`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_agent(ureq::AgentBuilder::new().build())
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, FetchError> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.set(name, value);
        }

        debug!("GET {url}");
        match request.call() {
            Ok(resp) => {
                let status = resp.status();
                let final_url = resp.get_url().to_owned();
                let header_values: Vec<(String, String)> = resp
                    .headers_names()
                    .into_iter()
                    .filter_map(|name| {
                        let value = resp.header(&name)?.to_owned();
                        Some((name, value))
                    })
                    .collect();

                let mut response = Response::new(final_url, status, Box::new(resp.into_reader()));
                for (name, value) in header_values {
                    response = response.with_header(&name, value);
                }
                Ok(response)
            }
            Err(ureq::Error::Status(status, resp)) => Err(FetchError::Status {
                status,
                url: resp.get_url().to_owned(),
            }),
            Err(ureq::Error::Transport(err)) => Err(FetchError::Transport {
                url: url.to_owned(),
                message: err.to_string(),
            }),
        }
    }
}
