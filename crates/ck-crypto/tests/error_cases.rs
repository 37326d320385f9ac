//! Unit tests for cryptographic error cases.
//!
//! These tests verify that the engines reject misuse and malformed input
//! with the appropriate error variant.

use std::sync::Arc;

use ck_crypto::cipher::{decrypt, Cipher, CipherAlgorithm, CipherConfig, Direction};
use ck_crypto::encoding::Encoding;
use ck_crypto::error::CryptoError;
use ck_crypto::hash::{HashAlgorithm, Hasher};
use ck_crypto::hmac::Hmac;
use ck_crypto::mode::Mode;
use ck_crypto::padding::Padding;
use ck_crypto::word_array::WordArray;

fn aes_key() -> WordArray {
    WordArray::from_bytes(&[0x11; 32])
}

#[test]
fn test_invalid_key_lengths() {
    let config = CipherConfig::with_iv(WordArray::from_bytes(&[0u8; 16]));
    let result = Cipher::encryptor(CipherAlgorithm::Aes, &WordArray::from("short"), config);
    assert!(matches!(
        result,
        Err(CryptoError::InvalidKeyLength {
            algorithm: "AES",
            actual: 5,
            ..
        })
    ));

    let config = CipherConfig::with_iv(WordArray::from_bytes(&[0u8; 8]));
    let result = Cipher::encryptor(CipherAlgorithm::Des, &WordArray::from("abc"), config);
    assert!(matches!(result, Err(CryptoError::InvalidKeyLength { .. })));

    let result = Cipher::encryptor(CipherAlgorithm::Rc4, &WordArray::new(), CipherConfig::default());
    assert!(matches!(result, Err(CryptoError::InvalidKeyLength { .. })));
}

#[test]
fn test_iv_errors() {
    let result = Cipher::encryptor(CipherAlgorithm::Aes, &aes_key(), CipherConfig::default());
    assert!(matches!(result, Err(CryptoError::MissingIv { mode: "cbc" })));

    let config = CipherConfig {
        iv: Some(WordArray::from_bytes(&[0u8; 15])),
        mode: Mode::Ctr,
        ..CipherConfig::default()
    };
    let result = Cipher::decryptor(CipherAlgorithm::Aes, &aes_key(), config);
    assert!(matches!(
        result,
        Err(CryptoError::InvalidIvLength {
            expected: 16,
            actual: 15
        })
    ));
}

#[test]
fn test_decrypt_with_wrong_key_fails_unpadding_or_garbles() {
    let config = CipherConfig::with_iv(WordArray::from_bytes(&[0u8; 16]));
    let ct = ck_crypto::cipher::encrypt(
        CipherAlgorithm::Aes,
        "sixteen byte msg",
        &aes_key(),
        config.clone(),
    )
    .unwrap();

    let wrong = WordArray::from_bytes(&[0x22; 32]);
    match decrypt(CipherAlgorithm::Aes, &ct, &wrong, config) {
        Err(CryptoError::UnpaddingAmbiguity { scheme, .. }) => assert_eq!(scheme, "pkcs7"),
        Ok(pt) => assert_ne!(pt.to_bytes(), b"sixteen byte msg"),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unpadding_count_exceeds_length() {
    // One block whose last byte decrypts to a count larger than the block
    let key = aes_key();
    let ecb = |padding| CipherConfig {
        mode: Mode::Ecb,
        padding,
        ..CipherConfig::default()
    };
    let mut block = vec![0u8; 15];
    block.push(0xff);
    let ct = ck_crypto::cipher::encrypt(CipherAlgorithm::Aes, block, &key, ecb(Padding::NoPadding))
        .unwrap();

    let result = decrypt(CipherAlgorithm::Aes, &ct, &key, ecb(Padding::Pkcs7));
    assert!(matches!(
        result,
        Err(CryptoError::UnpaddingAmbiguity { scheme: "pkcs7", .. })
    ));
}

#[test]
fn test_finalized_engines_reject_input() {
    let mut hasher = Hasher::new(HashAlgorithm::Md5).unwrap();
    hasher.finalize().unwrap();
    assert!(matches!(hasher.update("x"), Err(CryptoError::Finalized("hasher"))));

    let mut mac = Hmac::new(HashAlgorithm::Sha256, "key").unwrap();
    mac.finalize().unwrap();
    assert!(matches!(mac.finalize_with("x"), Err(CryptoError::Finalized("hmac"))));

    let mut cipher = Cipher::new(
        CipherAlgorithm::Rc4,
        Direction::Encrypt,
        Arc::new(WordArray::from("key")),
        CipherConfig::default(),
    )
    .unwrap();
    cipher.finalize().unwrap();
    assert!(matches!(cipher.process("x"), Err(CryptoError::Finalized("cipher"))));
}

#[test]
fn test_malformed_encodings() {
    assert!(matches!(
        Encoding::Hex.parse("abc"),
        Err(CryptoError::MalformedInput(_))
    ));
    assert!(matches!(
        Encoding::Hex.parse("zz"),
        Err(CryptoError::MalformedInput(_))
    ));
    assert!(matches!(
        Encoding::Base64.parse("not base64!"),
        Err(CryptoError::MalformedInput(_))
    ));
    let invalid_utf8 = WordArray::from_bytes(&[0xff, 0xfe]);
    assert!(matches!(
        Encoding::Utf8.stringify(&invalid_utf8),
        Err(CryptoError::MalformedInput(_))
    ));
}

#[test]
fn test_unknown_names() {
    let err = "blowfish".parse::<CipherAlgorithm>().unwrap_err();
    assert_eq!(err.to_string(), "unknown cipher: blowfish");
    assert!("ripemd160".parse::<HashAlgorithm>().is_err());
    assert!("gcm".parse::<Mode>().is_err());
    assert!("pkcs1".parse::<Padding>().is_err());
    assert!("base32".parse::<Encoding>().is_err());
}
