//! Error types for outbound calls. None of these reach an end user directly:
//! content errors are logged and degraded, chat errors become a 500 body.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("invalid content API url: {0}")]
  InvalidUrl(String),

  #[error("transport error for {url}: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("HTTP {status} from {url}")]
  Status { status: reqwest::StatusCode, url: String },

  #[error("malformed payload from {url}: {source}")]
  Decode {
    url: String,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Error)]
pub enum ChatError {
  #[error("OpenAI API key not configured")]
  Disabled,

  #[error("OpenAI HTTP {status}: {message}")]
  Upstream { status: reqwest::StatusCode, message: String },

  #[error("Failed to process chat request: {0}")]
  Fetch(String),
}
