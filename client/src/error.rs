use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("non 200 response from API server ({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("could not decode project returned by API server")]
    Decode(#[source] reqwest::Error),
    #[error("project ID can not be empty")]
    EmptyProjectId,
}
