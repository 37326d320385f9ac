//! Exit code handling for the `ck` CLI.
//!
//! This module maps command failures to stable process exit codes.

use anyhow::Error;
use ck_core::error::CoreError;
use ck_crypto::error::CryptoError;
use std::process;

/// Standard exit codes used by the `ck` CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error (I/O, unreadable config)
    GeneralError = 1,
    /// Invalid arguments, unknown algorithm names or malformed input text
    InvalidArgs = 2,
    /// Cryptographic failure (bad key, bad padding, wrong password)
    CryptoError = 5,
    /// Internal error (a core failed its self-test)
    InternalError = 9,
}

impl ExitCode {
    /// Get the exit code as an i32.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get a human-readable description of the exit code.
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::InvalidArgs => "Invalid arguments or usage",
            ExitCode::CryptoError => "Cryptographic error",
            ExitCode::InternalError => "Internal error",
        }
    }

    /// Categorizes a cryptographic error.
    pub fn from_crypto_error(error: &CryptoError) -> Self {
        match error {
            CryptoError::MalformedInput(_) | CryptoError::UnknownAlgorithm { .. } => {
                ExitCode::InvalidArgs
            }
            CryptoError::CoreNotReady { .. } | CryptoError::CsprngUnavailable(_) => {
                ExitCode::InternalError
            }
            _ => ExitCode::CryptoError,
        }
    }

    /// Convert from an anyhow::Error to an ExitCode by inspecting its chain.
    pub fn from_anyhow_error(error: &Error) -> Self {
        for cause in error.chain() {
            if let Some(crypto) = cause.downcast_ref::<CryptoError>() {
                return Self::from_crypto_error(crypto);
            }
            if let Some(core) = cause.downcast_ref::<CoreError>() {
                return match core {
                    CoreError::CryptoError(crypto) => Self::from_crypto_error(crypto),
                    CoreError::SerializationError(_)
                    | CoreError::InvalidFormat { .. }
                    | CoreError::UnknownName { .. } => ExitCode::InvalidArgs,
                };
            }
        }
        ExitCode::GeneralError
    }
}

/// Exit handler that manages process termination with appropriate codes.
pub struct ExitHandler {
    verbose: bool,
}

impl ExitHandler {
    /// Create a new exit handler.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Exit with a specific exit code.
    pub fn exit_with_code(&self, code: ExitCode) -> ! {
        if self.verbose {
            eprintln!(
                "Exiting with code {} ({})",
                code.as_i32(),
                code.description()
            );
        }
        process::exit(code.as_i32());
    }

    /// Print `error` with its context chain and exit with the matching code.
    pub fn exit_with_anyhow_error(&self, error: &Error) -> ! {
        eprintln!("Error: {:#}", error);
        self.exit_with_code(ExitCode::from_anyhow_error(error));
    }

    /// Handle a Result, exiting on error or returning the value on success.
    pub fn handle_result<T>(&self, result: Result<T, Error>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.exit_with_anyhow_error(&error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArgs.as_i32(), 2);
        assert_eq!(ExitCode::CryptoError.as_i32(), 5);
        assert_eq!(ExitCode::InternalError.as_i32(), 9);
    }

    #[test]
    fn test_exit_code_descriptions() {
        assert_eq!(ExitCode::Success.description(), "Success");
        assert_eq!(ExitCode::CryptoError.description(), "Cryptographic error");
    }

    #[test]
    fn test_crypto_errors_through_context() {
        let err = Err::<(), _>(CryptoError::UnpaddingAmbiguity {
            scheme: "pkcs7",
            reason: "count exceeds data".to_string(),
        })
        .context("Failed to decrypt")
        .unwrap_err();
        assert_eq!(ExitCode::from_anyhow_error(&err), ExitCode::CryptoError);

        let err = Error::new(CryptoError::MalformedInput("bad hex".to_string()));
        assert_eq!(ExitCode::from_anyhow_error(&err), ExitCode::InvalidArgs);
    }

    #[test]
    fn test_core_errors() {
        let err = Error::new(CoreError::InvalidFormat {
            format: "openssl".to_string(),
            reason: "truncated".to_string(),
        });
        assert_eq!(ExitCode::from_anyhow_error(&err), ExitCode::InvalidArgs);

        let err = Error::new(CoreError::CryptoError(CryptoError::CoreNotReady {
            algorithm: "AES",
            reason: "mismatch".to_string(),
        }));
        assert_eq!(ExitCode::from_anyhow_error(&err), ExitCode::InternalError);
    }

    #[test]
    fn test_other_errors_are_general() {
        let err = anyhow::anyhow!("disk full");
        assert_eq!(ExitCode::from_anyhow_error(&err), ExitCode::GeneralError);
    }
}
