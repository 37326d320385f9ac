//! End-to-end tests that run the `ck` binary.

use anyhow::Result;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn ck(dir: &TempDir, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_ck"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()?;

    if !output.status.success() {
        eprintln!("Command failed with exit code: {:?}", output.status.code());
        eprintln!("Stderr: {}", String::from_utf8_lossy(&output.stderr));
    }
    Ok(output)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_hash_inline_text() -> Result<()> {
    let dir = TempDir::new()?;
    let output = ck(&dir, &["hash", "-a", "sha1", "abc"])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "a9993e364706816aba3e25717850c26c9cd0d89d");
    Ok(())
}

#[test]
fn test_hash_from_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("message.txt");
    fs::write(&path, "message digest")?;

    let output = ck(&dir, &["hash", "-a", "md5", "-i", path.to_str().unwrap()])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "f96b697d7cb7938d525a2f31aaf161d0");
    Ok(())
}

#[test]
fn test_hmac() -> Result<()> {
    let dir = TempDir::new()?;
    let output = ck(
        &dir,
        &["hmac", "-a", "sha1", "-k", "Jefe", "what do ya want for nothing?"],
    )?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79");
    Ok(())
}

#[test]
fn test_pbkdf2() -> Result<()> {
    let dir = TempDir::new()?;
    let output = ck(
        &dir,
        &[
            "pbkdf2", "-p", "password", "-s", "73616c74", "-a", "sha1", "--iter", "2",
            "--key-size", "5",
        ],
    )?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
    Ok(())
}

#[test]
fn test_decrypt_openssl_envelope() -> Result<()> {
    let dir = TempDir::new()?;
    let output = ck(
        &dir,
        &[
            "decrypt",
            "-p",
            "Secret Passphrase",
            "--md",
            "md5",
            "U2FsdGVkX1+hssPU5fYHGLIIrcrxPf/LBDOBnHQCIjQ=",
        ],
    )?;
    assert!(output.status.success());
    assert_eq!(output.stdout, b"Message");
    Ok(())
}

#[test]
fn test_encrypt_decrypt_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let encrypted = ck(&dir, &["encrypt", "-c", "triple-des", "-p", "pw", "secret text"])?;
    assert!(encrypted.status.success());
    let envelope = stdout(&encrypted);
    assert!(envelope.starts_with("U2FsdGVkX1"));

    let decrypted = ck(&dir, &["decrypt", "-c", "triple-des", "-p", "pw", &envelope])?;
    assert!(decrypted.status.success());
    assert_eq!(decrypted.stdout, b"secret text");
    Ok(())
}

#[test]
fn test_project_config_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join(".ck.yaml"),
        "cipher: rc4-drop\nformat: json\nkdf: pbkdf2\niterations: 100\n",
    )?;

    let encrypted = ck(&dir, &["encrypt", "-p", "pw", "configured"])?;
    assert!(encrypted.status.success());
    let envelope = stdout(&encrypted);
    let value: serde_json::Value = serde_json::from_str(&envelope)?;
    assert!(value["s"].is_string());

    let decrypted = ck(&dir, &["decrypt", "-p", "pw", &envelope])?;
    assert!(decrypted.status.success());
    assert_eq!(decrypted.stdout, b"configured");

    // Flags win over the file
    let wrong = ck(&dir, &["decrypt", "-p", "pw", "-f", "openssl", &envelope])?;
    assert!(!wrong.status.success());
    Ok(())
}

#[test]
fn test_encrypt_rejects_odd_salt_length() -> Result<()> {
    let dir = TempDir::new()?;
    let ok = ck(&dir, &["encrypt", "-p", "pw", "-s", "0011223344556677", "salted"])?;
    assert!(ok.status.success());
    assert!(stdout(&ok).starts_with("U2FsdGVkX18AESIzRFVmd"));

    for salt in ["00112233", "00112233445566778899aabbccddeeff"] {
        let bad = ck(&dir, &["encrypt", "-p", "pw", "-s", salt, "salted"])?;
        assert!(!bad.status.success());
        assert!(String::from_utf8_lossy(&bad.stderr).contains("8 bytes"));
    }
    Ok(())
}

#[test]
fn test_init_writes_usable_config() -> Result<()> {
    let dir = TempDir::new()?;
    let init = ck(&dir, &["init"])?;
    assert!(init.status.success());
    let written = fs::read_to_string(dir.path().join(".ck.yaml"))?;
    assert!(written.contains("pbkdf2"));

    let again = ck(&dir, &["init"])?;
    assert!(!again.status.success());
    assert!(ck(&dir, &["init", "--force"])?.status.success());

    let encrypted = ck(&dir, &["encrypt", "-p", "pw", "from init"])?;
    assert!(encrypted.status.success());
    let decrypted = ck(&dir, &["decrypt", "-p", "pw", &stdout(&encrypted)])?;
    assert_eq!(decrypted.stdout, b"from init");
    Ok(())
}

#[test]
fn test_raw_key_mode() -> Result<()> {
    let dir = TempDir::new()?;
    let key = "2b7e151628aed2a6abf7158809cf4f3c";
    let iv = "000102030405060708090a0b0c0d0e0f";

    let encrypted = ck(&dir, &["encrypt", "-k", key, "--iv", iv, "-m", "cfb", "hello"])?;
    assert!(encrypted.status.success());

    let decrypted = ck(
        &dir,
        &["decrypt", "-k", key, "--iv", iv, "-m", "cfb", &stdout(&encrypted)],
    )?;
    assert_eq!(decrypted.stdout, b"hello");
    Ok(())
}

#[test]
fn test_exit_codes() -> Result<()> {
    let dir = TempDir::new()?;

    let unknown = ck(&dir, &["hash", "-a", "whirlpool", "x"])?;
    assert_eq!(unknown.status.code(), Some(2));

    let missing_iv = ck(&dir, &["encrypt", "-k", "00112233445566778899aabbccddeeff", "x"])?;
    assert_eq!(missing_iv.status.code(), Some(5));

    let bad_config = TempDir::new()?;
    fs::write(bad_config.path().join(".ck.yaml"), "cipher: [unclosed")?;
    let broken = ck(&bad_config, &["hash", "x"])?;
    assert_eq!(broken.status.code(), Some(1));
    Ok(())
}
