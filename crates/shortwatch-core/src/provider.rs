use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{ShortInterest, Symbol};

/// Upstream error classification shared by universe sources and providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    Timeout,
    InvalidRequest,
    Internal,
}

/// Structured upstream error.
///
/// Carries enough classification for callers to decide between retry,
/// fallback, and per-item omission without string matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Timeout,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    /// Map a transport failure, preserving the timeout classification.
    pub fn from_transport(error: &crate::http_client::HttpError) -> Self {
        if error.timed_out() {
            Self::timeout(error.message())
        } else if error.retryable() {
            Self::unavailable(error.message())
        } else {
            Self::internal(error.message())
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Lookup contract for short-interest metrics.
///
/// One call resolves one symbol. Batch behavior (ordering, per-item failure
/// isolation) is owned by the fetcher, not the provider.
pub trait ShortInterestProvider: Send + Sync {
    /// Stable label used in status messages and envelope metadata.
    fn id(&self) -> &'static str;

    /// Fetches the short-interest snapshot for a single symbol.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the upstream call fails, times out, or
    /// the response cannot be interpreted. Absent metric fields in an
    /// otherwise valid response are NOT errors; they come back as `None`.
    fn short_interest<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<ShortInterest, SourceError>> + Send + 'a>>;
}
