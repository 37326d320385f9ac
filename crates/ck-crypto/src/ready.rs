//! Process-wide readiness gates for the numeric cores.
//!
//! Each core family runs a known-answer self-test the first time an engine
//! asks for it. The outcome is cached for the life of the process; a family
//! that fails its self-test stays unusable and every later request gets the
//! same `CoreNotReady` error.

use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::core::aes::AesCore;
use crate::core::des::DesCore;
use crate::core::md5::Md5Core;
use crate::core::rc4::Rc4Core;
use crate::core::sha1::Sha1Core;
use crate::core::sha2::{Sha256Core, Sha512Core};
use crate::core::{BlockCipherCore, HashCore, StreamCipherCore};
use crate::encoding::Encoding;
use crate::error::{CryptoError, Result};
use crate::word_array::WordArray;

type Outcome = std::result::Result<(), String>;

/// A group of algorithms sharing one numeric core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreFamily {
    /// MD5 compression.
    Md5,
    /// SHA-1 compression.
    Sha1,
    /// SHA-224 and SHA-256 compression.
    Sha256,
    /// SHA-384 and SHA-512 compression.
    Sha512,
    /// AES block cipher.
    Aes,
    /// DES and Triple-DES block cipher.
    Des,
    /// RC4 keystream.
    Rc4,
}

impl CoreFamily {
    /// Every family, in gate order.
    pub const ALL: [CoreFamily; 7] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha512,
        Self::Aes,
        Self::Des,
        Self::Rc4,
    ];

    /// Display name of the family.
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
            Self::Aes => "AES",
            Self::Des => "DES",
            Self::Rc4 => "RC4",
        }
    }

    fn gate(self) -> &'static OnceLock<Outcome> {
        static MD5: OnceLock<Outcome> = OnceLock::new();
        static SHA1: OnceLock<Outcome> = OnceLock::new();
        static SHA256: OnceLock<Outcome> = OnceLock::new();
        static SHA512: OnceLock<Outcome> = OnceLock::new();
        static AES: OnceLock<Outcome> = OnceLock::new();
        static DES: OnceLock<Outcome> = OnceLock::new();
        static RC4: OnceLock<Outcome> = OnceLock::new();

        match self {
            Self::Md5 => &MD5,
            Self::Sha1 => &SHA1,
            Self::Sha256 => &SHA256,
            Self::Sha512 => &SHA512,
            Self::Aes => &AES,
            Self::Des => &DES,
            Self::Rc4 => &RC4,
        }
    }

    fn self_test(self) -> Outcome {
        match self {
            Self::Md5 => {
                // "abc" padded to one block, length stored little-endian
                let mut block = abc_block(16);
                block[14] = 24u32.swap_bytes();
                check_hash(Md5Core::new(), &block, "900150983cd24fb0d6963f7d28e17f72")
            }
            Self::Sha1 => {
                let mut block = abc_block(16);
                block[15] = 24;
                check_hash(
                    Sha1Core::new(),
                    &block,
                    "a9993e364706816aba3e25717850c26c9cd0d89d",
                )
            }
            Self::Sha256 => {
                let mut block = abc_block(16);
                block[15] = 24;
                check_hash(
                    Sha256Core::sha256(),
                    &block,
                    "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
                )
            }
            Self::Sha512 => {
                let mut block = abc_block(32);
                block[31] = 24;
                check_hash(
                    Sha512Core::sha512(),
                    &block,
                    "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                     2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
                )
            }
            Self::Aes => {
                let core = AesCore::new(&hex("000102030405060708090a0b0c0d0e0f")?)
                    .map_err(|e| e.to_string())?;
                check_block(
                    &core,
                    "00112233445566778899aabbccddeeff",
                    "69c4e0d86a7b0430d8cdb78070b4c55a",
                )
            }
            Self::Des => {
                let core = DesCore::new(&hex("133457799bbcdff1")?).map_err(|e| e.to_string())?;
                check_block(&core, "0123456789abcdef", "85e813540f0ab405")
            }
            Self::Rc4 => {
                let mut core =
                    Rc4Core::new(&WordArray::from("Key"), 0).map_err(|e| e.to_string())?;
                let mut data = WordArray::from("Plaintext");
                core.apply_keystream(data.words_mut());
                expect_hex(&data, "bbf316e8d940af0ad3")
            }
        }
    }
}

impl fmt::Display for CoreFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn hex(s: &str) -> std::result::Result<WordArray, String> {
    Encoding::Hex.parse(s).map_err(|e| e.to_string())
}

fn abc_block(words: usize) -> Vec<u32> {
    let mut block = vec![0u32; words];
    block[0] = 0x6162_6380;
    block
}

fn expect_hex(actual: &WordArray, expected: &str) -> Outcome {
    let actual = actual.to_hex();
    if actual == expected {
        Ok(())
    } else {
        Err(format!("known-answer mismatch: expected {expected}, got {actual}"))
    }
}

fn check_hash(mut core: impl HashCore, block: &[u32], expected: &str) -> Outcome {
    core.process_block(block);
    expect_hex(&core.output(), expected)
}

fn check_block(core: &dyn BlockCipherCore, plaintext: &str, expected: &str) -> Outcome {
    let mut block = hex(plaintext)?;
    core.encrypt_block(block.words_mut());
    expect_hex(&block, expected)?;
    core.decrypt_block(block.words_mut());
    expect_hex(&block, plaintext)
}

/// Runs the family's self-test on first use and reports the cached outcome.
///
/// Concurrent first callers block until one of them finishes the test.
///
/// # Errors
///
/// Returns `CryptoError::CoreNotReady` if the self-test failed.
pub fn ensure_ready(family: CoreFamily) -> Result<()> {
    let outcome = family.gate().get_or_init(|| {
        let outcome = family.self_test();
        match &outcome {
            Ok(()) => debug!("{} core passed its self-test", family),
            Err(reason) => warn!("{} core failed its self-test: {}", family, reason),
        }
        outcome
    });
    outcome.clone().map_err(|reason| CryptoError::CoreNotReady {
        algorithm: family.name(),
        reason,
    })
}

/// Returns true if the family has already passed its self-test.
///
/// Never triggers the self-test itself.
pub fn is_ready(family: CoreFamily) -> bool {
    matches!(family.gate().get(), Some(Ok(())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_passes() {
        for family in CoreFamily::ALL {
            ensure_ready(family).unwrap();
            assert!(is_ready(family), "{family} should be ready");
        }
    }

    #[test]
    fn test_ensure_ready_is_idempotent() {
        ensure_ready(CoreFamily::Sha256).unwrap();
        ensure_ready(CoreFamily::Sha256).unwrap();
        assert!(is_ready(CoreFamily::Sha256));
    }

    #[test]
    fn test_concurrent_first_use() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| ensure_ready(CoreFamily::Des).is_ok()))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn test_expect_hex_reports_mismatch() {
        let err = expect_hex(&WordArray::from_bytes(&[0xab]), "cd").unwrap_err();
        assert!(err.contains("expected cd"));
    }
}
