//! tests/roundtrip_tests.rs
//! End-to-end encrypt → decrypt scenarios through the fluent façade.

mod common;

use common::TEST_PASSWORD;
use ctrcrypt::{decrypt_bytes, encrypt_bytes, encrypt_string};

const PANGRAM: &str = "The quick brown fox jumped over the lazy dog. \
                       1234567890 -=_+ !@#$%^&*() {}|\\][ \"';: <>,./?";

#[test]
fn pangram_roundtrip() {
    let ciphertext = encrypt_string(PANGRAM)
        .with_password(TEST_PASSWORD)
        .into_bytes()
        .unwrap();
    let plaintext = decrypt_bytes(ciphertext)
        .with_password(TEST_PASSWORD)
        .into_string()
        .unwrap();
    assert_eq!(plaintext, PANGRAM);
}

#[test]
fn empty_string_roundtrip() {
    let ciphertext = encrypt_string("")
        .with_password(TEST_PASSWORD)
        .into_bytes()
        .unwrap();
    // at least the header: 2 length-field bytes + 4 + minimum nonce + salt
    assert!(ciphertext.len() >= 20, "got {} bytes", ciphertext.len());

    let plaintext = decrypt_bytes(ciphertext)
        .with_password(TEST_PASSWORD)
        .into_string()
        .unwrap();
    assert_eq!(plaintext, "");
}

#[test]
fn single_space_roundtrip() {
    let ciphertext = encrypt_string(" ")
        .with_password(TEST_PASSWORD)
        .into_bytes()
        .unwrap();
    let plaintext = decrypt_bytes(ciphertext)
        .with_password(TEST_PASSWORD)
        .into_string()
        .unwrap();
    assert_eq!(plaintext, " ");
}

#[test]
fn byte_patterns_roundtrip() {
    // sizes chosen around block (16) and pad-batch (4096) boundaries
    let sizes = [1usize, 15, 16, 17, 255, 4095, 4096, 4097, 3 * 4096 + 5];
    for size in sizes {
        let plaintext: Vec<u8> = (0..size).map(|i| (i * 31 % 251) as u8).collect();
        let ciphertext = encrypt_bytes(plaintext.clone())
            .with_password(TEST_PASSWORD)
            .into_bytes()
            .unwrap();
        let decrypted = decrypt_bytes(ciphertext)
            .with_password(TEST_PASSWORD)
            .into_bytes()
            .unwrap();
        assert_eq!(decrypted, plaintext, "size {size}");
    }
}

#[test]
fn repeated_encryption_differs() {
    let first = encrypt_string("hello")
        .with_password(TEST_PASSWORD)
        .into_bytes()
        .unwrap();
    let second = encrypt_string("hello")
        .with_password(TEST_PASSWORD)
        .into_bytes()
        .unwrap();

    // fresh nonce and salt each time
    assert_ne!(first, second);

    for ciphertext in [first, second] {
        let plaintext = decrypt_bytes(ciphertext)
            .with_password(TEST_PASSWORD)
            .into_string()
            .unwrap();
        assert_eq!(plaintext, "hello");
    }
}

#[test]
fn wrong_password_garbles_without_error() {
    let plaintext: Vec<u8> = (0..512u32).map(|i| (i % 256) as u8).collect();
    let ciphertext = encrypt_bytes(plaintext.clone())
        .with_password(TEST_PASSWORD)
        .into_bytes()
        .unwrap();

    let garbled = decrypt_bytes(ciphertext)
        .with_password("NotThePassword")
        .into_bytes()
        .unwrap();

    assert_eq!(garbled.len(), plaintext.len());
    assert_ne!(garbled, plaintext);
    // almost every byte should differ; a keystream collision this long
    // would mean the KDF ignored the password
    let matching = garbled
        .iter()
        .zip(&plaintext)
        .filter(|(a, b)| a == b)
        .count();
    assert!(matching < plaintext.len() / 8, "{matching} bytes matched");
}

#[test]
fn unicode_roundtrip() {
    let text = "pässwörd ✓ 密码 🔐";
    let ciphertext = encrypt_string(text)
        .with_password("paßwort-mit-umlaut")
        .into_bytes()
        .unwrap();
    let plaintext = decrypt_bytes(ciphertext)
        .with_password("paßwort-mit-umlaut")
        .into_string()
        .unwrap();
    assert_eq!(plaintext, text);
}

#[test]
fn empty_password_rejected() {
    let err = encrypt_string("data")
        .with_password("")
        .into_bytes()
        .unwrap_err();
    assert!(matches!(err, ctrcrypt::CtrcryptError::Argument(_)));
}
