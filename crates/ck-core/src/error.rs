//! Core error types.

use thiserror::Error;

/// Errors that can occur while building, formatting or opening envelopes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cryptographic operation failed.
    #[error("crypto error: {0}")]
    CryptoError(#[from] ck_crypto::error::CryptoError),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Serialized envelope does not match the expected layout.
    #[error("invalid {format} envelope: {reason}")]
    InvalidFormat {
        /// Envelope format name.
        format: String,
        /// What was wrong with the input.
        reason: String,
    },

    /// An envelope name (format or KDF) was not recognized.
    #[error("unknown {kind}: {name}")]
    UnknownName {
        /// What kind of name was being parsed.
        kind: &'static str,
        /// The unrecognized name.
        name: String,
    },
}

/// Result type for envelope operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ck_crypto::error::CryptoError;

    #[test]
    fn test_crypto_error_converts() {
        fn fails() -> Result<()> {
            let inner: std::result::Result<(), CryptoError> =
                Err(CryptoError::MissingIv { mode: "cbc" });
            inner?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert!(matches!(err, CoreError::CryptoError(CryptoError::MissingIv { .. })));
        assert_eq!(
            err.to_string(),
            "crypto error: cbc mode requires an initialization vector"
        );
    }

    #[test]
    fn test_invalid_format_display() {
        let err = CoreError::InvalidFormat {
            format: "openssl".to_string(),
            reason: "truncated salt".to_string(),
        };
        assert_eq!(err.to_string(), "invalid openssl envelope: truncated salt");
    }
}
