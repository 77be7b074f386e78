//! Error types for the sponsor SDK.
//!
//! This module provides a unified error type [`SponsorError`] covering every
//! stage of a sponsored call: encoding arguments, resolving objects, funding
//! gas, collecting signatures and executing on chain.

use std::fmt;
use thiserror::Error;

/// A specialized Result type for sponsor SDK operations.
pub type SponsorResult<T> = Result<T, SponsorError>;

/// The main error type for the sponsor SDK.
///
/// The first group of variants mirrors the protocol's failure taxonomy and is
/// what callers usually match on. The rest are transport and decoding errors
/// raised by the layers underneath.
#[derive(Error, Debug)]
pub enum SponsorError {
    /// Malformed input to the encoder or formatter. Never retryable.
    #[error("Format error: {0}")]
    Format(String),

    /// An object referenced by a call could not be resolved on chain
    #[error("Failed to resolve object {object_id}: {reason}")]
    Resolution {
        /// The object that could not be resolved
        object_id: String,
        /// Why resolution failed
        reason: String,
        /// Whether the failure was caused by connectivity rather than absence
        retryable: bool,
    },

    /// The sponsor holds no usable fee coin
    #[error("Sponsor {owner} has no {coin_symbol} for gas")]
    InsufficientGas {
        /// The sponsor address that was queried
        owner: String,
        /// Short symbol of the fee coin, e.g. `SUI`
        coin_symbol: String,
        /// Detail about the coin selection that failed
        detail: String,
    },

    /// A signature does not belong to the expected signer or bytes
    #[error("Signature mismatch at position {position}: {reason}")]
    SignatureMismatch {
        /// Index of the offending signature in the envelope
        position: usize,
        /// What did not match
        reason: String,
    },

    /// The execution engine rejected the transaction
    #[error("Execution failed: {status}")]
    Execution {
        /// Status or error string reported by the engine
        status: String,
        /// Transaction digest, when the engine assigned one
        digest: Option<String>,
        /// Raw effects payload returned by the engine
        effects: Option<serde_json::Value>,
    },

    /// A sponsor request was missing required fields
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Error occurred during HTTP communication
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error occurred during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error occurred during BCS serialization/deserialization
    #[error("BCS error: {0}")]
    Bcs(String),

    /// Error occurred during URL parsing
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Error occurred during hex encoding/decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Error occurred during base64 decoding
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Invalid public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Invalid signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid type tag format
    #[error("Invalid type tag: {0}")]
    InvalidTypeTag(String),

    /// The ledger RPC returned an error response
    #[error("API error ({status_code}): {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
        /// JSON-RPC error code, when present
        rpc_code: Option<i64>,
    },

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal SDK error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Any other error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Longest message, in bytes, that is logged or returned without truncation.
const LOG_MESSAGE_LIMIT: usize = 1000;

/// Substrings that suggest a message is carrying key material.
const REDACT_MARKERS: [&str; 5] = ["suiprivkey", "private_key", "privkey", "secret", "mnemonic"];

impl SponsorError {
    /// Creates a new BCS error
    pub fn bcs<E: fmt::Display>(err: E) -> Self {
        Self::Bcs(err.to_string())
    }

    /// Creates a new format error
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Self::Format(msg.into())
    }

    /// Creates a format error that names the offending argument position
    pub fn argument(index: usize, msg: impl fmt::Display) -> Self {
        Self::Format(format!("argument {index}: {msg}"))
    }

    /// Creates a resolution error for an object that does not exist
    pub fn object_missing(object_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            object_id: object_id.into(),
            reason: reason.into(),
            retryable: false,
        }
    }

    /// Wraps a lower-level failure that happened while resolving an object.
    ///
    /// The resulting error is retryable only when the cause was.
    pub fn resolution(object_id: impl Into<String>, cause: &SponsorError) -> Self {
        Self::Resolution {
            object_id: object_id.into(),
            reason: cause.to_string(),
            retryable: !cause.is_not_found() && cause.is_retryable(),
        }
    }

    /// Creates a signature mismatch error
    pub fn signature_mismatch(position: usize, reason: impl Into<String>) -> Self {
        Self::SignatureMismatch {
            position,
            reason: reason.into(),
        }
    }

    /// Creates a new API error from response details
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
            rpc_code: None,
        }
    }

    /// Creates a new API error carrying a JSON-RPC error code
    pub fn api_with_code(status_code: u16, message: impl Into<String>, rpc_code: i64) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
            rpc_code: Some(rpc_code),
        }
    }

    /// Returns true if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Resolution {
                    retryable: false,
                    ..
                }
                | Self::Api {
                    status_code: 404,
                    ..
                }
        )
    }

    /// Returns true if this is a transient error that might succeed on retry.
    ///
    /// Funding exhaustion, signature problems and on-chain execution failures
    /// are never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status_code, .. } => {
                matches!(status_code, 429 | 500 | 502 | 503 | 504)
            }
            Self::Resolution { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Returns the HTTP status a sponsor endpoint answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::Format(_) => 400,
            _ => 500,
        }
    }

    /// Renders the error for logs and HTTP bodies.
    ///
    /// Control characters other than newline and tab are dropped, anything that
    /// looks like key material replaces the whole message, and the result is
    /// capped at [`LOG_MESSAGE_LIMIT`] bytes.
    ///
    /// ```rust
    /// use sui_sponsor_sdk::SponsorError;
    ///
    /// let err = SponsorError::api(502, "upstream\u{0}closed");
    /// assert_eq!(err.sanitized_message(), "API error (502): upstreamclosed");
    /// ```
    pub fn sanitized_message(&self) -> String {
        let text: String = self
            .to_string()
            .chars()
            .filter(|c| matches!(c, '\n' | '\t') || !c.is_control())
            .collect();

        let folded = text.to_ascii_lowercase();
        if let Some(marker) = REDACT_MARKERS.iter().find(|m| folded.contains(*m)) {
            return format!("[redacted {} error: matched '{marker}']", self.kind());
        }

        if text.len() <= LOG_MESSAGE_LIMIT {
            return text;
        }
        let cut = (0..=LOG_MESSAGE_LIMIT)
            .rev()
            .find(|i| text.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{} (+{} bytes)", &text[..cut], text.len() - cut)
    }

    /// Short label for the failure class, used in logs and redacted messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Format(_) | Self::BadRequest(_) => "request",
            Self::Resolution { .. } | Self::NotFound(_) => "resolution",
            Self::InsufficientGas { .. } => "gas",
            Self::SignatureMismatch { .. }
            | Self::InvalidSignature(_)
            | Self::SignatureVerificationFailed => "signature",
            Self::InvalidPublicKey(_) | Self::InvalidPrivateKey(_) => "key",
            Self::Execution { .. } => "execution",
            Self::Http(_) | Self::Api { .. } | Self::Url(_) => "rpc",
            Self::Json(_) | Self::Bcs(_) | Self::Hex(_) | Self::Base64(_) | Self::InvalidTypeTag(_) => {
                "decode"
            }
            Self::Config(_) => "config",
            Self::Internal(_) | Self::Other(_) => "internal",
        }
    }

    /// A fixed message safe to show an untrusted client.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            "request" => "Invalid sponsorship request",
            "resolution" => "Referenced object could not be loaded",
            "gas" => "Sponsor has no gas available",
            "signature" => "Signatures do not match the transaction",
            "execution" => "Transaction execution failed",
            "rpc" => "Ledger node unavailable",
            "decode" => "Failed to process data",
            _ => "Sponsor misconfigured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SponsorError::format("bad address");
        assert_eq!(err.to_string(), "Format error: bad address");
    }

    #[test]
    fn test_argument_error_names_position() {
        let err = SponsorError::argument(2, "expected an object id");
        assert_eq!(
            err.to_string(),
            "Format error: argument 2: expected an object id"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(SponsorError::NotFound("test".to_string()).is_not_found());
        assert!(SponsorError::object_missing("0x6", "deleted").is_not_found());
        assert!(SponsorError::api(404, "not found").is_not_found());
        assert!(!SponsorError::api(500, "server error").is_not_found());
    }

    #[test]
    fn test_is_retryable() {
        assert!(SponsorError::api(429, "rate limited").is_retryable());
        assert!(SponsorError::api(503, "unavailable").is_retryable());
        assert!(SponsorError::api(500, "internal error").is_retryable());
        assert!(SponsorError::api(502, "bad gateway").is_retryable());
        assert!(SponsorError::api(504, "timeout").is_retryable());
        assert!(!SponsorError::api(400, "bad request").is_retryable());
    }

    #[test]
    fn test_resolution_inherits_retryability() {
        let transient = SponsorError::resolution("0xabc", &SponsorError::api(503, "busy"));
        assert!(transient.is_retryable());
        assert!(!transient.is_not_found());

        let missing = SponsorError::resolution("0xabc", &SponsorError::NotFound("gone".into()));
        assert!(!missing.is_retryable());
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_protocol_failures_are_not_retryable() {
        let gas = SponsorError::InsufficientGas {
            owner: "0x1".to_string(),
            coin_symbol: "SUI".to_string(),
            detail: "no coins".to_string(),
        };
        assert!(!gas.is_retryable());
        assert_eq!(gas.to_string(), "Sponsor 0x1 has no SUI for gas");

        let mismatch = SponsorError::signature_mismatch(1, "wrong signer");
        assert!(!mismatch.is_retryable());
        assert!(mismatch.to_string().contains("position 1"));

        let exec = SponsorError::Execution {
            status: "MoveAbort".to_string(),
            digest: None,
            effects: None,
        };
        assert!(!exec.is_retryable());
        assert!(exec.to_string().contains("MoveAbort"));
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(SponsorError::BadRequest("missing".into()).status_code(), 400);
        assert_eq!(SponsorError::format("bad").status_code(), 400);
        assert_eq!(
            SponsorError::InvalidPrivateKey("bad".into()).status_code(),
            500
        );
        assert_eq!(SponsorError::api(404, "x").status_code(), 500);
    }

    #[test]
    fn test_bcs_error() {
        let err = SponsorError::bcs("serialization failed");
        assert!(matches!(err, SponsorError::Bcs(_)));
        assert!(err.to_string().contains("serialization failed"));
    }

    #[test]
    fn test_api_error_with_code() {
        let err = SponsorError::api_with_code(200, "Invalid params", -32602);
        if let SponsorError::Api {
            status_code,
            message,
            rpc_code,
        } = err
        {
            assert_eq!(status_code, 200);
            assert_eq!(message, "Invalid params");
            assert_eq!(rpc_code, Some(-32602));
        } else {
            panic!("Expected Api error variant");
        }
    }

    #[test]
    fn test_sanitized_message_truncates_long_messages() {
        let err = SponsorError::api(500, "x".repeat(2000));
        let sanitized = err.sanitized_message();
        assert!(sanitized.len() < 1100);
        assert!(sanitized.ends_with("bytes)"));
    }

    #[test]
    fn test_sanitized_message_removes_control_chars() {
        let sanitized = SponsorError::api(400, "bad\x00request\x1f").sanitized_message();
        assert_eq!(sanitized, "API error (400): badrequest");
    }

    #[test]
    fn test_sanitized_message_redacts_key_material() {
        let err = SponsorError::InvalidPrivateKey("suiprivkey1qq...".to_string());
        let sanitized = err.sanitized_message();
        assert!(sanitized.starts_with("[redacted key error"));
        assert!(!sanitized.contains("suiprivkey1qq"));
    }

    #[test]
    fn test_kind_groups_failures() {
        assert_eq!(SponsorError::format("bad").kind(), "request");
        assert_eq!(SponsorError::api(503, "busy").kind(), "rpc");
        assert_eq!(SponsorError::signature_mismatch(0, "x").kind(), "signature");
    }

    #[test]
    fn test_user_message_hides_details() {
        let err = SponsorError::InvalidPrivateKey("0xdeadbeef".into());
        assert_eq!(err.user_message(), "Sponsor misconfigured");
        assert_eq!(
            SponsorError::api(503, "node 10.0.0.3 down").user_message(),
            "Ledger node unavailable"
        );
    }
}
