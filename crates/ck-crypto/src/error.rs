//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur while buffering, hashing, encrypting or deriving keys.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Input could not be decoded with the requested encoding.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Key material has a length the algorithm cannot use.
    #[error("invalid key length for {algorithm}: expected {expected}, got {actual} bytes")]
    InvalidKeyLength {
        /// Algorithm that rejected the key.
        algorithm: &'static str,
        /// Human-readable description of the accepted lengths.
        expected: &'static str,
        /// Actual key length in bytes.
        actual: usize,
    },

    /// Initialization vector does not match the cipher block size.
    #[error("invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength {
        /// Expected IV length in bytes.
        expected: usize,
        /// Actual IV length in bytes.
        actual: usize,
    },

    /// A chaining mode that needs an IV was configured without one.
    #[error("{mode} mode requires an initialization vector")]
    MissingIv {
        /// Name of the chaining mode.
        mode: &'static str,
    },

    /// OS random number generator is unavailable (fatal).
    #[error("randomness source unavailable: {0}")]
    CsprngUnavailable(String),

    /// A numeric core failed its known-answer self-test.
    #[error("{algorithm} core not ready: {reason}")]
    CoreNotReady {
        /// Core family name.
        algorithm: &'static str,
        /// Why the core was rejected.
        reason: String,
    },

    /// Padding could not be stripped from the final block.
    #[error("cannot remove {scheme} padding: {reason}")]
    UnpaddingAmbiguity {
        /// Padding scheme name.
        scheme: &'static str,
        /// What was wrong with the padding.
        reason: String,
    },

    /// The engine already produced its output and must be reset before reuse.
    #[error("{0} already finalized; call reset() before reuse")]
    Finalized(&'static str),

    /// An algorithm, mode or padding name was not recognized.
    #[error("unknown {kind}: {name}")]
    UnknownAlgorithm {
        /// What kind of name was being parsed.
        kind: &'static str,
        /// The unrecognized name.
        name: String,
    },
}

/// Result type for cryptographic operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_key_length() {
        let err = CryptoError::InvalidKeyLength {
            algorithm: "AES",
            expected: "16, 24 or 32 bytes",
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "invalid key length for AES: expected 16, 24 or 32 bytes, got 7 bytes"
        );
    }

    #[test]
    fn test_display_finalized() {
        let err = CryptoError::Finalized("hasher");
        assert_eq!(
            err.to_string(),
            "hasher already finalized; call reset() before reuse"
        );
    }

    #[test]
    fn test_display_missing_iv() {
        let err = CryptoError::MissingIv { mode: "CBC" };
        assert!(err.to_string().contains("CBC"));
    }
}
