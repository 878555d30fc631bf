use std::fmt;

/// Errors from talking to the admin GraphQL API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Request never got a response (DNS, connect, timeout)
    Network(String),
    /// Server answered with a non-success status
    Http { status: u16, message: String },
    /// Server answered 200 with a non-empty `errors` array
    Graphql(Vec<String>),
    /// Response body didn't match the expected shape
    Decode(String),
    /// Neither `data` nor `errors` carried the requested field
    MissingData(&'static str),
    /// Token rejected or missing
    Unauthorized,
}

impl ClientError {
    /// One-line message suitable for a toast
    pub fn summary(&self) -> String {
        match self {
            Self::Graphql(messages) => messages
                .first()
                .cloned()
                .unwrap_or_else(|| "Unknown GraphQL error".to_string()),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Http { status, message } => write!(f, "HTTP {}: {}", status, message),
            Self::Graphql(messages) => write!(f, "GraphQL error: {}", messages.join("; ")),
            Self::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            Self::MissingData(field) => write!(f, "Response had no data for '{}'", field),
            Self::Unauthorized => write!(f, "Not authorized, check your API token"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Self::Unauthorized;
            }
            return Self::Http {
                status: status.as_u16(),
                message: e.to_string(),
            };
        }
        Self::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
