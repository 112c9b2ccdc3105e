use jtool_crypto::rsa::{self, PrivateKey, PublicKey, RsaKeyPair};
use std::sync::OnceLock;

static PAIR: OnceLock<RsaKeyPair> = OnceLock::new();

/// One 1024-bit pair shared by every test in the binary; generation is slow.
///
/// # Panics
/// If key generation or parsing fails.
pub fn key_pair() -> &'static RsaKeyPair {
    PAIR.get_or_init(|| rsa::create_keys(1024).expect("rsa key generation failed"))
}

/// # Panics
/// If the shared pair cannot be parsed back.
#[must_use]
pub fn parsed_keys() -> (PublicKey, PrivateKey) {
    let pair = key_pair();
    (
        rsa::public_key(&pair.public_key).expect("public key parse failed"),
        rsa::private_key(&pair.private_key).expect("private key parse failed"),
    )
}
