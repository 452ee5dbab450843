/// Failure reported by an external generation or synthesis provider.
///
/// Each kind carries its own user-facing message; none of them is retried inside this crate.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The credential was missing, malformed or rejected.
    #[error("invalid or missing credential")]
    InvalidCredential,

    /// Too many requests in a short window.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The account's quota is used up.
    #[error("quota exceeded")]
    QuotaExceeded,

    /// Any other provider-side failure.
    #[error("provider failure: {0}")]
    Failed(String),
}

impl ProviderError {
    /// Classify a provider response from its HTTP status and error text.
    ///
    /// The status wins when it is specific; otherwise the message is searched for the phrases
    /// providers use for each kind.
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        match status {
            Some(401) | Some(403) => return Self::InvalidCredential,
            Some(429) => {
                return if mentions_quota(message) {
                    Self::QuotaExceeded
                } else {
                    Self::RateLimited
                };
            }
            _ => {}
        }
        let lower = message.to_ascii_lowercase();
        if lower.contains("api key") || lower.contains("credential") || lower.contains("unauthorized")
        {
            Self::InvalidCredential
        } else if mentions_quota(&lower) {
            Self::QuotaExceeded
        } else if lower.contains("rate limit") {
            Self::RateLimited
        } else {
            Self::Failed(message.trim().to_owned())
        }
    }

    /// Message suitable for end users, distinct per kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "Invalid API key. Please check your provider credentials.",
            Self::RateLimited => "Rate limit exceeded. Please try again later.",
            Self::QuotaExceeded => "API quota exceeded. Please check your plan or try again later.",
            Self::Failed(_) => "Generation failed. Please try again.",
        }
    }

    /// HTTP status an API boundary would answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidCredential => 403,
            Self::RateLimited | Self::QuotaExceeded => 429,
            Self::Failed(_) => 500,
        }
    }
}

fn mentions_quota(message: &str) -> bool {
    message.to_ascii_lowercase().contains("quota")
}

#[cfg(test)]
#[path = "../../tests/unit/provider/error.rs"]
mod tests;
