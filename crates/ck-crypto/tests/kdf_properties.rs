//! Property-based tests for PBKDF2 and EvpKDF.

use ck_crypto::hash::HashAlgorithm;
use ck_crypto::kdf::{evp_kdf, pbkdf2, EvpKdfConfig, Pbkdf2Config};
use proptest::prelude::*;

fn fast_pbkdf2(key_size_words: usize) -> Pbkdf2Config {
    Pbkdf2Config {
        key_size_words,
        iterations: 3,
        hasher: HashAlgorithm::Sha256,
    }
}

/// Property: KDF Determinism
///
/// For the same password, salt and configuration, both derivations SHALL
/// produce identical output.
#[test]
fn property_kdf_determinism() {
    proptest!(ProptestConfig::with_cases(64), |(
        password in prop::collection::vec(any::<u8>(), 0..64),
        salt in prop::collection::vec(any::<u8>(), 0..16),
        key_size_words in 1usize..20
    )| {
        let config = fast_pbkdf2(key_size_words);
        let a = pbkdf2(password.clone(), salt.clone(), &config).unwrap();
        let b = pbkdf2(password.clone(), salt.clone(), &config).unwrap();
        prop_assert_eq!(a, b);

        let evp = EvpKdfConfig { key_size_words, ..EvpKdfConfig::default() };
        let c = evp_kdf(password.clone(), salt.clone(), &evp).unwrap();
        let d = evp_kdf(password, salt, &evp).unwrap();
        prop_assert_eq!(c, d);
    });
}

/// Property: Exact Output Length
///
/// Derived keys SHALL be exactly `key_size_words * 4` bytes.
#[test]
fn property_output_length() {
    proptest!(ProptestConfig::with_cases(64), |(
        key_size_words in 0usize..40,
        hasher in prop::sample::select(HashAlgorithm::ALL.to_vec())
    )| {
        let config = Pbkdf2Config { key_size_words, iterations: 2, hasher };
        prop_assert_eq!(pbkdf2("pw", "salt", &config).unwrap().sig_bytes(), key_size_words * 4);

        let evp = EvpKdfConfig { key_size_words, iterations: 2, hasher };
        prop_assert_eq!(evp_kdf("pw", "salt", &evp).unwrap().sig_bytes(), key_size_words * 4);
    });
}

/// Property: Prefix Consistency
///
/// A shorter derivation SHALL be a prefix of a longer one with the same inputs.
#[test]
fn property_prefix_consistency() {
    proptest!(ProptestConfig::with_cases(32), |(
        password in prop::collection::vec(any::<u8>(), 1..32),
        short in 1usize..10,
        extra in 1usize..10
    )| {
        let a = pbkdf2(password.clone(), "salt", &fast_pbkdf2(short)).unwrap();
        let b = pbkdf2(password.clone(), "salt", &fast_pbkdf2(short + extra)).unwrap();
        prop_assert_eq!(&b.to_bytes()[..short * 4], &a.to_bytes()[..]);

        let evp = |key_size_words| EvpKdfConfig { key_size_words, ..EvpKdfConfig::default() };
        let c = evp_kdf(password.clone(), "salt", &evp(short)).unwrap();
        let d = evp_kdf(password, "salt", &evp(short + extra)).unwrap();
        prop_assert_eq!(&d.to_bytes()[..short * 4], &c.to_bytes()[..]);
    });
}

/// Property: Salt Separation
///
/// Different salts SHALL produce different keys for the same password.
#[test]
fn property_salt_separation() {
    proptest!(ProptestConfig::with_cases(64), |(
        password in prop::collection::vec(any::<u8>(), 1..32),
        salt1 in prop::collection::vec(any::<u8>(), 8..=8),
        salt2 in prop::collection::vec(any::<u8>(), 8..=8)
    )| {
        prop_assume!(salt1 != salt2);
        let config = fast_pbkdf2(8);
        let a = pbkdf2(password.clone(), salt1.clone(), &config).unwrap();
        let b = pbkdf2(password.clone(), salt2.clone(), &config).unwrap();
        prop_assert_ne!(a, b);

        let evp = EvpKdfConfig::default();
        prop_assert_ne!(
            evp_kdf(password.clone(), salt1, &evp).unwrap(),
            evp_kdf(password, salt2, &evp).unwrap()
        );
    });
}
