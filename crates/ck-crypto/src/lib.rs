//! Streaming block-processing engine for cipherkit.
//!
//! Every hash and cipher in this crate follows the same incremental contract:
//! data is appended to a [`buffered::BlockProcessor`], complete blocks are
//! released to a numeric core, and `finalize` pads and flushes whatever is
//! left. Byte sequences travel as [`word_array::WordArray`] values packed into
//! big-endian 32-bit words.
//!
//! # Modules
//!
//! - `word_array`: byte sequences as big-endian words
//! - `encoding`: Hex, Latin1, UTF-8, UTF-16, Base64 and Base64url codecs
//! - `buffered`: the shared block-release algorithm
//! - `core`: numeric cores (MD5, SHA-1, SHA-2, AES, DES, Triple-DES, RC4)
//! - `ready`: once-per-process core self-tests
//! - `hash`: streaming digests
//! - `cipher`: streaming encryption and decryption
//! - `mode`: block-cipher chaining modes
//! - `padding`: block padding schemes
//! - `hmac`: keyed-hash message authentication
//! - `kdf`: PBKDF2 and `EVP_BytesToKey`
//! - `random`: secure random byte generation
//! - `error`: cryptographic error types

#![deny(missing_docs)]
#![deny(clippy::all)]

pub mod buffered;
pub mod cipher;
pub mod core;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod hmac;
pub mod kdf;
pub mod mode;
pub mod padding;
pub mod random;
pub mod ready;
pub mod word_array;

pub use cipher::{Cipher, CipherAlgorithm, CipherConfig, Direction};
pub use encoding::Encoding;
pub use error::{CryptoError, Result};
pub use hash::{HashAlgorithm, Hasher};
pub use hmac::Hmac;
pub use mode::Mode;
pub use padding::Padding;
pub use word_array::WordArray;
