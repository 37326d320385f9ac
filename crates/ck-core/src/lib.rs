//! Envelope encryption for cipherkit.
//!
//! This crate wraps the streaming ciphers of `ck-crypto` with everything
//! needed to ship ciphertext somewhere else: cipher params, text formats,
//! and password-based key derivation. It performs no I/O.
//!
//! # Modules
//!
//! - `params`: ciphertext plus key, IV, salt and cipher settings
//! - `format`: OpenSSL and JSON envelope formats
//! - `kdf`: password to key and IV derivation
//! - `serializable`: raw-key encryption returning cipher params
//! - `password`: password-based encryption compatible with `openssl enc`
//! - `error`: core error types

#![deny(missing_docs)]
#![deny(clippy::all)]

pub mod error;
pub mod format;
pub mod kdf;
pub mod params;
pub mod password;
pub mod serializable;

pub use error::{CoreError, Result};
pub use format::Format;
pub use kdf::{DerivedParams, Kdf};
pub use params::CipherParams;
pub use password::PasswordConfig;
pub use serializable::SerializableConfig;
