//! Crate-wide error taxonomy.
//!
//! Both upstreams (the openF1 data API and the LLM provider) are opaque
//! collaborators, so failures are classified by what the caller can do about
//! them rather than by transport detail:
//! - [`Error::Network`]: the upstream was unreachable
//! - [`Error::Upstream`]: the upstream answered with a non-success status
//! - [`Error::MalformedResponse`]: the body did not match the expected shape
//! - [`Error::BoundExceeded`]: the tool-call loop hit its iteration cap

use thiserror::Error;

use crate::config::ConfigError;

/// The external service a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// The openF1 data API.
    OpenF1,
    /// The LLM provider.
    Llm,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::OpenF1 => write!(f, "openF1 API"),
            Service::Llm => write!(f, "LLM provider"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The upstream could not be reached (DNS, connect, timeout).
    #[error("network error reaching {service}: {source}")]
    Network {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status code.
    #[error("{service} returned status {status}: {message}")]
    Upstream {
        service: Service,
        status: u16,
        message: String,
    },

    /// The upstream answered 2xx but the body did not decode into the
    /// expected shape.
    #[error("malformed response from {service}: {detail}")]
    MalformedResponse { service: Service, detail: String },

    /// The conversation loop requested tool calls on every iteration and
    /// never produced a final answer.
    #[error("tool-call loop exceeded {limit} iterations without a final answer")]
    BoundExceeded { limit: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
