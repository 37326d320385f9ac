//! Keyed-hash message authentication (RFC 2104).

use std::fmt;

use zeroize::Zeroize;

use crate::error::{CryptoError, Result};
use crate::hash::{HashAlgorithm, Hasher};
use crate::word_array::WordArray;

const INNER_PAD: u32 = 0x3636_3636;
const OUTER_PAD: u32 = 0x5c5c_5c5c;

/// An incremental HMAC over any supported digest.
///
/// # Examples
///
/// ```
/// use ck_crypto::hash::HashAlgorithm;
/// use ck_crypto::hmac::Hmac;
///
/// let mut mac = Hmac::new(HashAlgorithm::Md5, "Jefe").unwrap();
/// mac.update("what do ya want ").unwrap();
/// let tag = mac.finalize_with("for nothing?").unwrap();
/// assert_eq!(tag.to_hex(), "750c783e6ab0b503eaa86e310a5db738");
/// ```
#[derive(Clone)]
pub struct Hmac {
    hasher: Hasher,
    inner_key: WordArray,
    outer_key: WordArray,
    finalized: bool,
}

impl Hmac {
    /// Creates an HMAC keyed with `key`.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The underlying digest
    /// * `key` - Secret key; keys longer than one digest block are hashed first
    ///
    /// # Returns
    ///
    /// A primed HMAC, or `CryptoError::CoreNotReady` if the digest core failed
    /// its self-test
    pub fn new<K: Into<WordArray>>(algorithm: HashAlgorithm, key: K) -> Result<Self> {
        algorithm.ensure_ready()?;
        let mut key = key.into();
        let mac = Self::unchecked(algorithm, &key);
        key.zeroize();
        Ok(mac)
    }

    /// Creates an HMAC without consulting the readiness gate.
    pub(crate) fn unchecked(algorithm: HashAlgorithm, key: &WordArray) -> Self {
        let mut hasher = Hasher::unchecked(algorithm);
        let block_size_words = algorithm.block_size_words();
        let block_bytes = block_size_words * 4;

        let mut key = if key.sig_bytes() > block_bytes {
            hasher.absorb(key);
            let digest = hasher.finish();
            hasher.reset();
            digest
        } else {
            key.clone()
        };
        key.clamp();
        key.set_sig_bytes(block_bytes);

        let mut inner_key = key.clone();
        let mut outer_key = key.clone();
        key.zeroize();
        for word in inner_key.words_mut().iter_mut().take(block_size_words) {
            *word ^= INNER_PAD;
        }
        for word in outer_key.words_mut().iter_mut().take(block_size_words) {
            *word ^= OUTER_PAD;
        }

        let mut mac = Self {
            hasher,
            inner_key,
            outer_key,
            finalized: false,
        };
        mac.reset();
        mac
    }

    /// The underlying digest.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.hasher.algorithm()
    }

    /// Restarts the MAC with the same key.
    pub fn reset(&mut self) {
        self.hasher.reset();
        self.hasher.absorb(&self.inner_key);
        self.finalized = false;
    }

    /// Feeds more message data.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Finalized` if the MAC was finalized and not reset.
    pub fn update<D: Into<WordArray>>(&mut self, data: D) -> Result<&mut Self> {
        self.check_live()?;
        self.hasher.absorb(&data.into());
        Ok(self)
    }

    /// Returns the authentication tag.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Finalized` on a second call without reset.
    pub fn finalize(&mut self) -> Result<WordArray> {
        self.check_live()?;
        Ok(self.finish())
    }

    /// Feeds `data` and returns the tag.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Finalized` if the MAC was already finalized.
    pub fn finalize_with<D: Into<WordArray>>(&mut self, data: D) -> Result<WordArray> {
        self.check_live()?;
        self.hasher.absorb(&data.into());
        Ok(self.finish())
    }

    /// Computes the tag of `data` and leaves the MAC primed for the next message.
    pub(crate) fn compute(&mut self, data: &WordArray) -> WordArray {
        self.hasher.absorb(data);
        let tag = self.finish();
        self.reset();
        tag
    }

    fn finish(&mut self) -> WordArray {
        let inner = self.hasher.finish();
        self.hasher.reset();
        self.hasher.absorb(&self.outer_key);
        self.hasher.absorb(&inner);
        self.finalized = true;
        self.hasher.finish()
    }

    fn check_live(&self) -> Result<()> {
        if self.finalized {
            Err(CryptoError::Finalized("hmac"))
        } else {
            Ok(())
        }
    }
}

impl Drop for Hmac {
    fn drop(&mut self) {
        self.inner_key.zeroize();
        self.outer_key.zeroize();
    }
}

impl fmt::Debug for Hmac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hmac")
            .field("algorithm", &self.algorithm())
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}

/// Computes an HMAC tag in one call.
///
/// # Examples
///
/// ```
/// use ck_crypto::hash::HashAlgorithm;
/// use ck_crypto::hmac::hmac;
///
/// let tag = hmac(HashAlgorithm::Sha1, "Jefe", "what do ya want for nothing?").unwrap();
/// assert_eq!(tag.to_hex(), "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79");
/// ```
pub fn hmac<K, D>(algorithm: HashAlgorithm, key: K, data: D) -> Result<WordArray>
where
    K: Into<WordArray>,
    D: Into<WordArray>,
{
    Hmac::new(algorithm, key)?.finalize_with(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4231_case_1() {
        let tag = hmac(HashAlgorithm::Sha256, vec![0x0bu8; 20], "Hi There").unwrap();
        assert_eq!(
            tag.to_hex(),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn test_rfc4231_case_6_long_key() {
        // 131-byte key is hashed before use
        let tag = hmac(
            HashAlgorithm::Sha256,
            vec![0xaau8; 131],
            "Test Using Larger Than Block-Size Key - Hash Key First",
        )
        .unwrap();
        assert_eq!(
            tag.to_hex(),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
    }

    #[test]
    fn test_rfc4231_case_1_sha512() {
        let tag = hmac(HashAlgorithm::Sha512, vec![0x0bu8; 20], "Hi There").unwrap();
        assert_eq!(
            tag.to_hex(),
            "87aa7cdea5ef619d4ff0b4241a1d6cb02379f4e2ce4ec2787ad0b30545e17cde\
             daa833b7d6b8a702038b274eaea3f4e4be9d914eeb61f1702e696c203a126854"
        );
    }

    #[test]
    fn test_finalize_is_read_once() {
        let mut mac = Hmac::new(HashAlgorithm::Sha1, "key").unwrap();
        let first = mac.finalize_with("data").unwrap();
        assert!(matches!(mac.finalize(), Err(CryptoError::Finalized(_))));

        mac.reset();
        assert_eq!(mac.finalize_with("data").unwrap(), first);
    }

    #[test]
    fn test_compute_reprimes() {
        let mut mac = Hmac::new(HashAlgorithm::Md5, "Jefe").unwrap();
        let data = WordArray::from("what do ya want for nothing?");
        let a = mac.compute(&data);
        let b = mac.compute(&data);
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), "750c783e6ab0b503eaa86e310a5db738");
    }

    #[test]
    fn test_different_keys_differ() {
        let a = hmac(HashAlgorithm::Sha256, "k1", "msg").unwrap();
        let b = hmac(HashAlgorithm::Sha256, "k2", "msg").unwrap();
        assert_ne!(a, b);
    }
}
