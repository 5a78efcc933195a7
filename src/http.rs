use std::time::Duration;

use thiserror::Error;

const BODY_PREVIEW_CHARS: usize = 240;

#[derive(Debug, Error)]
pub(crate) enum HttpError {
    #[error("HTTP status {status}{}", body_suffix(.body))]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response decode failed: {0}")]
    Decode(String),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({body})")
    }
}

pub(crate) fn build_agent(connect_timeout: Duration, read_timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(connect_timeout)
        .timeout_read(read_timeout)
        .timeout_write(read_timeout)
        .build()
}

pub(crate) fn get_text(
    agent: &ureq::Agent,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, HttpError> {
    let mut request = agent.get(url);
    for (key, value) in query {
        request = request.query(key, value);
    }

    match request.call() {
        Ok(response) => response
            .into_string()
            .map_err(|err| HttpError::Decode(err.to_string())),
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().ok().unwrap_or_default();
            let body = body
                .trim()
                .chars()
                .take(BODY_PREVIEW_CHARS)
                .collect::<String>();
            Err(HttpError::Status { status, body })
        }
        Err(ureq::Error::Transport(err)) => Err(HttpError::Transport(err.to_string())),
    }
}
