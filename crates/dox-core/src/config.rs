//! OCR service configuration.

/// Environment variable holding the Read service base URL.
pub const OCR_ENDPOINT_VAR: &str = "DOX_OCR_ENDPOINT";
/// Environment variable holding the subscription key.
pub const OCR_KEY_VAR: &str = "DOX_OCR_KEY";

/// Credentials for the OCR collaborator, supplied out-of-band via the
/// process environment. Constructed once at process start and read-only
/// thereafter.
#[derive(Debug, Clone, Default)]
pub struct OcrConfig {
    /// Base URL of the Read service.
    pub endpoint: String,
    /// Subscription key sent with every request.
    pub key: String,
}

impl OcrConfig {
    /// Read endpoint and key from the environment.
    ///
    /// Missing variables yield empty values rather than an error: missing
    /// or invalid credentials must surface as an authentication error at
    /// the first OCR submission, not at startup.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var(OCR_ENDPOINT_VAR).unwrap_or_default(),
            key: std::env::var(OCR_KEY_VAR).unwrap_or_default(),
        }
    }
}
