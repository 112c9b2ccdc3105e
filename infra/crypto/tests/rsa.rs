mod fixtures;

use jtool_crypto::{CryptoError, rsa};

#[test]
fn test_public_encrypt_private_decrypt_multi_block() -> Result<(), CryptoError> {
    let (public, private) = fixtures::parsed_keys();
    // 1024-bit keys take 117-byte blocks; this spans three.
    let text = "123456ABCDabcd".repeat(20);
    let sealed = rsa::public_encrypt(&text, &public)?;
    assert_eq!(rsa::private_decrypt(&sealed, &private)?, text);
    Ok(())
}

#[test]
fn test_private_encrypt_public_decrypt() -> Result<(), CryptoError> {
    let (public, private) = fixtures::parsed_keys();
    let text = "签名数据 with mixed text ".repeat(10);
    let sealed = rsa::private_encrypt(&text, &private)?;
    assert_eq!(rsa::public_decrypt(&sealed, &public)?, text);
    Ok(())
}

#[test]
fn test_sign_and_verify() -> Result<(), CryptoError> {
    let (public, private) = fixtures::parsed_keys();
    let signature = rsa::sign_sha1("amount=100&order=7", &private)?;
    assert!(rsa::verify_sha1("amount=100&order=7", &signature, &public));
    assert!(!rsa::verify_sha1("amount=101&order=7", &signature, &public));
    assert!(!rsa::verify_sha1("amount=100&order=7", "not base64 $$", &public));
    Ok(())
}

#[test]
fn test_keys_round_trip_through_text() -> Result<(), CryptoError> {
    let pair = fixtures::key_pair();
    let public = rsa::public_key(&pair.public_key)?;
    let reparsed = rsa::public_key(&pair.public_key.replace(' ', "\n"))?;
    assert_eq!(public, reparsed);
    assert!(rsa::private_key("AAAA").is_err());
    Ok(())
}

#[test]
fn test_ciphertext_uses_standard_alphabet_with_block_spaces() -> Result<(), CryptoError> {
    let (public, _) = fixtures::parsed_keys();
    // Three 128-byte blocks: 384 bytes, so eight full 45-byte runs.
    let sealed = rsa::public_encrypt(&"x".repeat(300), &public)?;

    assert!(!sealed.contains('-') && !sealed.contains('_'));
    assert!(sealed.chars().all(|c| c.is_ascii_alphanumeric() || "+/= ".contains(c)));

    let runs: Vec<&str> = sealed.split(' ').collect();
    assert_eq!(runs.len(), 384 / 45 + 1);
    assert!(runs[..runs.len() - 1].iter().all(|run| run.len() == 60));
    assert_eq!(runs[runs.len() - 1].len(), (384_usize % 45).div_ceil(3) * 4);
    Ok(())
}
