//! Secure random byte generation.
//!
//! This module provides secure random byte generation using the operating
//! system's cryptographically secure random number generator (CSPRNG).

use crate::error::{CryptoError, Result};

/// Fills a buffer with secure random bytes.
///
/// This function uses the operating system's CSPRNG via `getrandom`.
///
/// # Arguments
///
/// * `dest` - The buffer to fill with random bytes
///
/// # Returns
///
/// `Ok(())` on success, or `CryptoError::CsprngUnavailable` if the OS RNG is unavailable
///
/// # Examples
///
/// ```
/// use ck_crypto::random::fill_random;
///
/// let mut buffer = [0u8; 32];
/// fill_random(&mut buffer).unwrap();
/// ```
pub fn fill_random(dest: &mut [u8]) -> Result<()> {
    getrandom::getrandom(dest).map_err(|e| CryptoError::CsprngUnavailable(e.to_string()))
}

/// Generates `len` random bytes.
///
/// # Errors
///
/// Returns `CryptoError::CsprngUnavailable` if the OS RNG is unavailable.
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    fill_random(&mut bytes)?;
    Ok(bytes)
}
