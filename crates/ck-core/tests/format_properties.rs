//! Property-based tests for envelope formatting and parsing.

use ck_core::format::Format;
use ck_core::params::CipherParams;
use ck_crypto::word_array::WordArray;
use proptest::prelude::*;

fn bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..max)
}

/// Property: OpenSSL Envelope Roundtrip
///
/// For any ciphertext and 8-byte salt, stringifying then parsing the OpenSSL
/// format SHALL recover both.
#[test]
fn property_openssl_roundtrip() {
    proptest!(|(ciphertext in bytes(128), salt in prop::array::uniform8(any::<u8>()))| {
        let params = CipherParams {
            ciphertext: WordArray::from_bytes(&ciphertext),
            salt: Some(WordArray::from_bytes(&salt)),
            ..CipherParams::default()
        };

        let text = Format::OpenSsl.stringify(&params).unwrap();
        prop_assert!(text.starts_with("U2FsdGVkX1"));

        let parsed = Format::OpenSsl.parse(&text).unwrap();
        prop_assert_eq!(parsed.ciphertext, params.ciphertext);
        prop_assert_eq!(parsed.salt, params.salt);
    });
}

/// Property: Unsalted Envelope Is Plain Base64
///
/// Ciphertext without a salt SHALL parse back with no salt, unless it
/// happens to begin with the `Salted__` magic.
#[test]
fn property_openssl_unsalted_roundtrip() {
    proptest!(|(ciphertext in bytes(128))| {
        prop_assume!(!ciphertext.starts_with(b"Salted__"));
        let params = CipherParams::new(WordArray::from_bytes(&ciphertext));

        let parsed = Format::OpenSsl.parse(&params.stringify(None).unwrap()).unwrap();
        prop_assert_eq!(parsed.ciphertext, params.ciphertext);
        prop_assert_eq!(parsed.salt, None);
    });
}

/// Property: JSON Envelope Roundtrip
///
/// For any ciphertext, IV and salt, the JSON format SHALL preserve every
/// field that was set.
#[test]
fn property_json_roundtrip() {
    proptest!(|(
        ciphertext in bytes(96),
        iv in prop::option::of(bytes(32)),
        salt in prop::option::of(bytes(16)),
    )| {
        let params = CipherParams {
            ciphertext: WordArray::from_bytes(&ciphertext),
            iv: iv.as_deref().map(WordArray::from_bytes),
            salt: salt.as_deref().map(WordArray::from_bytes),
            ..CipherParams::default()
        };

        let parsed = Format::Json.parse(&Format::Json.stringify(&params).unwrap()).unwrap();
        prop_assert_eq!(parsed.ciphertext, params.ciphertext);
        prop_assert_eq!(parsed.iv, params.iv);
        prop_assert_eq!(parsed.salt, params.salt);
        prop_assert_eq!(parsed.format, Some(Format::Json));
    });
}

/// Property: Malformed Input Is Rejected
///
/// Arbitrary text that is not a JSON object SHALL produce an error rather than
/// a panic.
#[test]
fn property_json_garbage_rejected() {
    proptest!(|(input in "[a-z0-9 ]{0,64}")| {
        prop_assert!(Format::Json.parse(&input).is_err());
    });
}
