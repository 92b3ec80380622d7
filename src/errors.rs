use thiserror::Error;

/// Every failure a request can hit. The `Display` text is what the MCP client sees.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest {
        code: &'static str,
        message: &'static str,
    },
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("{0}")]
    Upstream(String),
    #[error("upstream request timed out")]
    UpstreamTimeout,
    #[error("upstream request failed: {0}")]
    UpstreamTransport(String),
    #[error("malformed upstream response: {0}")]
    MalformedUpstream(String),
    #[error("internal error")]
    Internal { code: &'static str, message: String },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: &'static str) -> Self {
        Self::BadRequest { code, message }
    }

    pub fn missing_query() -> Self {
        Self::bad_request("missing_query", "Query parameter is required")
    }

    pub fn upstream(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Upstream(format!("upstream error code {code}"))
        } else {
            Self::Upstream(message)
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: "internal_error",
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { code, .. } | Self::Internal { code, .. } => code,
            Self::UnknownMethod(_) => "unknown_method",
            Self::UnknownTool(_) => "unknown_tool",
            Self::Upstream(_) => "upstream_error",
            Self::UpstreamTimeout => "upstream_timeout",
            Self::UpstreamTransport(_) => "upstream_unavailable",
            Self::MalformedUpstream(_) => "malformed_upstream_response",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::UpstreamTimeout;
        }
        if err.is_decode() {
            return Self::MalformedUpstream(err.to_string());
        }
        match err.status() {
            Some(status) => Self::UpstreamTransport(format!("upstream returned {status}")),
            None => Self::UpstreamTransport(err.without_url().to_string()),
        }
    }
}
