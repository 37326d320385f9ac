//! Shared test utilities for cipherkit.
//!
//! Known-answer vectors from the published standards, plus proptest
//! strategies for splitting messages into arbitrary `update` chunks.

#![allow(missing_docs)]

pub mod vectors {
    //! Hex-encoded known-answer vectors.

    /// NIST SP 800-38A AES-128 key.
    pub const SP800_38A_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
    /// IV for the CBC, CFB and OFB examples.
    pub const SP800_38A_IV: &str = "000102030405060708090a0b0c0d0e0f";
    /// Initial counter block for the CTR example.
    pub const SP800_38A_COUNTER: &str = "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";
    /// The four plaintext blocks shared by every SP 800-38A example.
    pub const SP800_38A_PLAINTEXT: &str = "6bc1bee22e409f96e93d7e117393172a\
                                           ae2d8a571e03ac9c9eb76fac45af8e51\
                                           30c81c46a35ce411e5fbc1191a0a52ef\
                                           f69f2445df4f9b17ad2b417be66c3710";
    pub const SP800_38A_ECB: &str = "3ad77bb40d7a3660a89ecaf32466ef97\
                                     f5d3d58503b9699de785895a96fdbaaf\
                                     43b1cd7f598ece23881b00e3ed030688\
                                     7b0c785e27e8ad3f8223207104725dd4";
    pub const SP800_38A_CBC: &str = "7649abac8119b246cee98e9b12e9197d\
                                     5086cb9b507219ee95db113a917678b2\
                                     73bed6b8e3c1743b7116e69e22229516\
                                     3ff1caa1681fac09120eca307586e1a7";
    pub const SP800_38A_CFB: &str = "3b3fd92eb72dad20333449f8e83cfb4a\
                                     c8a64537a0b3a93fcde3cdad9f1ce58b\
                                     26751f67a3cbb140b1808cf187a4f4df\
                                     c04b05357c5d1c0eeac4c66f9ff7f2e6";
    pub const SP800_38A_OFB: &str = "3b3fd92eb72dad20333449f8e83cfb4a\
                                     7789508d16918f03f53c52dac54ed825\
                                     9740051e9c5fecf64344f7a82260edcc\
                                     304c6528f659c77866a510d9c1d6ae5e";
    pub const SP800_38A_CTR: &str = "874d6191b620e3261bef6864990db6ce\
                                     9806f66b7970fdff8617187bb9fffdff\
                                     5ae4df3edbd5d35e5b4f09020db03eab\
                                     1e031dda2fbe03d1792170a0f3009cee";

    /// (message, MD5, SHA-1, SHA-256) for RFC 1321 / FIPS 180 inputs.
    pub const DIGESTS: &[(&str, &str, &str, &str)] = &[
        (
            "",
            "d41d8cd98f00b204e9800998ecf8427e",
            "da39a3ee5e6b4b0d3255bfef95601890afd80709",
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        ),
        (
            "abc",
            "900150983cd24fb0d6963f7d28e17f72",
            "a9993e364706816aba3e25717850c26c9cd0d89d",
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        ),
        (
            "message digest",
            "f96b697d7cb7938d525a2f31aaf161d0",
            "c12252ceda8be8994d5fa0290a47231c1d16aae3",
            "f7846f55cf23e14eebeab5b4e1550cad5b509e3348fbc4efa3a1413d393cb650",
        ),
    ];

    /// (key, data, HMAC-MD5, HMAC-SHA1) from RFC 2202 case 2.
    pub const HMAC_JEFE: (&str, &str, &str, &str) = (
        "Jefe",
        "what do ya want for nothing?",
        "750c783e6ab0b503eaa86e310a5db738",
        "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79",
    );

    /// (iterations, derived key) for PBKDF2-HMAC-SHA1("password", "salt", 20 bytes), RFC 6070.
    pub const PBKDF2_SHA1: &[(u32, &str)] = &[
        (1, "0c60c80f961f0e71f3a9b524af6012062fe037a6"),
        (2, "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957"),
        (4096, "4b007901b765489abead49d926f721d065a429c1"),
    ];

    /// (iterations, derived key) for PBKDF2-HMAC-SHA256("password", "salt", 32 bytes).
    pub const PBKDF2_SHA256: &[(u32, &str)] = &[
        (
            1,
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b",
        ),
        (
            2,
            "ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43",
        ),
        (
            4096,
            "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a",
        ),
    ];

    /// Output of `openssl enc -base64` for the plaintext "Message":
    /// (cipher, kdf, password, salted envelope).
    pub const OPENSSL_ENC: &[(&str, &str, &str, &str)] = &[
        (
            "aes",
            "openssl",
            "Secret Passphrase",
            "U2FsdGVkX1+hssPU5fYHGLIIrcrxPf/LBDOBnHQCIjQ=",
        ),
        (
            "aes",
            "pbkdf2",
            "Secret Passphrase",
            "U2FsdGVkX1+hssPU5fYHGJvsYtPMrdUOmAGHLUEJnWo=",
        ),
        (
            "triple-des",
            "openssl",
            "pw",
            "U2FsdGVkX18BAgMEBQYHCE2hw6ORlk5z",
        ),
    ];

    /// `openssl enc -aes-256-cbc -md md5 -P` for salt a1b2c3d4e5f60718: (key, iv).
    pub const OPENSSL_EVP_AES256: (&str, &str) = (
        "09d065dbf3e0914575ef0f5ace7857bf0521d1e9390471a182bbeaed80c7d22a",
        "e85d471112862944b553e5859784354b",
    );
}

pub mod strategies {
    //! Proptest strategies.

    use proptest::prelude::*;

    /// A message of up to `max_len` bytes together with sorted cut points
    /// inside it.
    pub fn message_and_cuts(max_len: usize) -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
        prop::collection::vec(any::<u8>(), 0..max_len).prop_flat_map(|message| {
            let len = message.len();
            let cuts = prop::collection::vec(0..=len, 0..8).prop_map(|mut cuts| {
                cuts.sort_unstable();
                cuts
            });
            (Just(message), cuts)
        })
    }

    /// Splits `message` at the given sorted cut points. Empty chunks are kept.
    pub fn split_at_cuts<'a>(message: &'a [u8], cuts: &[usize]) -> Vec<&'a [u8]> {
        let mut chunks = Vec::with_capacity(cuts.len() + 1);
        let mut start = 0;
        for &cut in cuts {
            chunks.push(&message[start..cut]);
            start = cut;
        }
        chunks.push(&message[start..]);
        chunks
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_split_at_cuts_covers_message() {
            let message = b"abcdefgh";
            let chunks = split_at_cuts(message, &[0, 3, 3, 8]);
            assert_eq!(chunks, vec![&b""[..], &b"abc"[..], &b""[..], &b"defgh"[..], &b""[..]]);
            assert_eq!(chunks.concat(), message.to_vec());
        }
    }
}
