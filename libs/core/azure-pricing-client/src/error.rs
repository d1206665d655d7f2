//! Error taxonomy for the pricing client.
//!
//! Every failure surfaced by [`crate::PricingClient`] carries an [`ErrorKind`]
//! (or is a pass-through [`ContextError`]), so callers branch on the kind
//! instead of matching message text.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::context::ContextError;
use crate::filter::QueryContext;

pub type PricingResult<T> = Result<T, PricingError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of semantic failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Configuration rejected at construction
    InvalidConfig,
    /// HTTP 404, or a complete fetch that returned no items
    NotFound,
    /// HTTP 429 observed as the final response
    RateLimited,
    /// HTTP 503 observed as the final response
    ServiceUnavailable,
    /// Body could not be read or parsed as a page envelope
    InvalidResponse,
    /// Page safety limit reached with more pages pending
    PaginationLimitExceeded,
    /// Network failure, retry exhaustion or any other non-2xx status
    RequestFailed,
}

impl ErrorKind {
    /// Category label used in structured logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidConfig => "invalid_config",
            ErrorKind::NotFound => "not_found",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::InvalidResponse => "invalid_response",
            ErrorKind::PaginationLimitExceeded => "pagination_limit_exceeded",
            ErrorKind::RequestFailed => "request_failed",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ErrorKind::InvalidConfig => "invalid client configuration",
            ErrorKind::NotFound => "not found",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::ServiceUnavailable => "service unavailable",
            ErrorKind::InvalidResponse => "invalid API response",
            ErrorKind::PaginationLimitExceeded => "pagination limit exceeded",
            ErrorKind::RequestFailed => "request failed",
        }
    }

    /// Kind for a non-2xx status.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited,
            StatusCode::SERVICE_UNAVAILABLE => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::RequestFailed,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Log severity chosen for a terminal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the pricing client.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The caller's context was cancelled or its deadline passed.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// A classified failure.
    #[error("{kind}: {message}")]
    Api {
        kind: ErrorKind,
        status: Option<StatusCode>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A failure annotated with the query (and page) it occurred on.
    #[error("{query}{}: {source}", page_suffix(.page))]
    Query {
        query: QueryContext,
        page: Option<usize>,
        #[source]
        source: Box<PricingError>,
    },
}

fn page_suffix(page: &Option<usize>) -> String {
    page.map(|page| format!(" page {}", page)).unwrap_or_default()
}

impl PricingError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        PricingError::Api {
            kind,
            status: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig, message)
    }

    /// Non-2xx response, classified by status, with a bounded body snippet.
    pub fn from_status(status: StatusCode, snippet: &str) -> Self {
        PricingError::Api {
            kind: ErrorKind::from_status(status),
            status: Some(status),
            message: format!("status {}: {}", status.as_u16(), snippet),
            source: None,
        }
    }

    pub(crate) fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PricingError::Api {
            kind,
            status: None,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Attach query context and, for page failures, the zero-based page index.
    pub fn with_query(self, query: QueryContext, page: Option<usize>) -> Self {
        PricingError::Query {
            query,
            page,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping query annotations.
    fn root(&self) -> &PricingError {
        match self {
            PricingError::Query { source, .. } => source.root(),
            other => other,
        }
    }

    /// Taxonomy kind; `None` for cancellation and deadline errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self.root() {
            PricingError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }

    pub fn context_error(&self) -> Option<ContextError> {
        match self.root() {
            PricingError::Context(err) => Some(*err),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.context_error() == Some(ContextError::Cancelled)
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        self.context_error() == Some(ContextError::DeadlineExceeded)
    }

    /// HTTP status of the final response, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self.root() {
            PricingError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Page index the failure occurred on, when it happened mid-pagination.
    pub fn page(&self) -> Option<usize> {
        match self {
            PricingError::Query { page, .. } => *page,
            _ => None,
        }
    }

    /// Category label for logs: the kind's label, `canceled` or `deadline_exceeded`.
    pub fn category(&self) -> &'static str {
        match (self.kind(), self.context_error()) {
            (Some(kind), _) => kind.as_str(),
            (None, Some(ContextError::Cancelled)) => "canceled",
            (None, Some(ContextError::DeadlineExceeded)) => "deadline_exceeded",
            (None, None) => "unknown",
        }
    }

    /// Severity a terminal log record for this error is written at.
    pub fn severity(&self) -> Severity {
        match self.kind() {
            Some(ErrorKind::NotFound) => Severity::Debug,
            Some(ErrorKind::RateLimited) => Severity::Warn,
            Some(ErrorKind::ServiceUnavailable)
            | Some(ErrorKind::InvalidResponse)
            | Some(ErrorKind::PaginationLimitExceeded)
            | Some(ErrorKind::InvalidConfig) => Severity::Error,
            Some(ErrorKind::RequestFailed) => match self.status() {
                Some(status) if status.is_client_error() => Severity::Warn,
                Some(status) if status.is_server_error() => Severity::Error,
                _ => Severity::Debug,
            },
            None => Severity::Debug,
        }
    }

    /// gRPC code for callers exposing results over RPC.
    pub fn grpc_code(&self) -> tonic::Code {
        if let Some(err) = self.context_error() {
            return match err {
                ContextError::Cancelled => tonic::Code::Cancelled,
                ContextError::DeadlineExceeded => tonic::Code::DeadlineExceeded,
            };
        }
        match self.kind() {
            Some(ErrorKind::NotFound) => tonic::Code::NotFound,
            Some(ErrorKind::RateLimited) => tonic::Code::ResourceExhausted,
            Some(ErrorKind::ServiceUnavailable) => tonic::Code::Unavailable,
            _ => tonic::Code::Internal,
        }
    }
}

impl From<PricingError> for tonic::Status {
    fn from(err: PricingError) -> Self {
        tonic::Status::new(err.grpc_code(), err.to_string())
    }
}
