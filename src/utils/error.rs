use thiserror::Error;

/// 上游擷取失敗的內部分類；對外一律回報為 500
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalErrorKind {
    Network,
    Timeout,
    UpstreamStatus(u16),
    RateLimited(u16),
    Parse,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RetrievalError {
    kind: RetrievalErrorKind,
    message: String,
}

impl RetrievalError {
    pub fn new(kind: RetrievalErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RetrievalErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(RetrievalErrorKind::Timeout, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(RetrievalErrorKind::Parse, message)
    }

    /// 依上游狀態碼分類；403/429 視為被限流或封鎖
    pub fn from_status(source: &str, status: u16, url: &str) -> Self {
        match status {
            403 | 429 => Self::new(
                RetrievalErrorKind::RateLimited(status),
                format!("{} blocked or rate-limited the request ({}) for {}", source, status, url),
            ),
            _ => Self::new(
                RetrievalErrorKind::UpstreamStatus(status),
                format!("{} returned HTTP {} for {}", source, status, url),
            ),
        }
    }

    pub fn kind(&self) -> RetrievalErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 穩定的內部錯誤代碼，用於日誌
    pub fn code(&self) -> &'static str {
        match self.kind {
            RetrievalErrorKind::Network => "upstream_unreachable",
            RetrievalErrorKind::Timeout => "upstream_timeout",
            RetrievalErrorKind::UpstreamStatus(_) => "upstream_status",
            RetrievalErrorKind::RateLimited(_) => "upstream_rate_limited",
            RetrievalErrorKind::Parse => "parse_failure",
        }
    }

    /// 是否值得重試（逾時、連線失敗、上游 5xx）
    pub fn is_transient(&self) -> bool {
        match self.kind {
            RetrievalErrorKind::Network | RetrievalErrorKind::Timeout => true,
            RetrievalErrorKind::UpstreamStatus(status) => status >= 500,
            RetrievalErrorKind::RateLimited(_) | RetrievalErrorKind::Parse => false,
        }
    }
}

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        let target = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "upstream".to_string());

        if err.is_timeout() {
            Self::timeout(format!("Request to {} timed out", target))
        } else if err.is_decode() || err.is_body() {
            Self::parse(format!("Failed to read response from {}: {}", target, err))
        } else {
            Self::network(format!("Failed to reach {}: {}", target, err))
        }
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No adapter registered for source '{source_id}'")]
    MissingAdapter { source_id: String },

    #[error("Failed to bind {address}: {message}")]
    BindError { address: String, message: String },
}

pub type Result<T> = std::result::Result<T, GatewayError>;
