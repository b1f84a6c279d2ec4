use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::error;

const SALT_LEN: usize = 8;
const HASH_LEN: usize = 32;

/// Derive a salted credential string in the form `"<salt>.<hash>"`,
/// both parts hex-encoded. A fresh random salt is drawn per call.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let hash = derive(plain, &salt)?;
    Ok(format!("{}.{}", hex::encode(salt), hex::encode(hash)))
}

/// Check a plaintext password against a stored composite credential.
/// Errors only on a corrupt record or KDF failure, never on a mismatch.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let (salt_hex, expected_hash) = stored
        .split_once('.')
        .ok_or_else(|| anyhow::anyhow!("malformed credential record"))?;
    let salt = hex::decode(salt_hex)?;

    let hash = derive(plain, &salt)?;
    Ok(hex::encode(hash) == expected_hash)
}

fn derive(plain: &str, salt: &[u8]) -> anyhow::Result<[u8; HASH_LEN]> {
    let mut out = [0u8; HASH_LEN];
    Argon2::default()
        .hash_password_into(plain.as_bytes(), salt, &mut out)
        .map_err(|e| {
            error!(error = %e, "argon2 key derivation error");
            anyhow::anyhow!(e.to_string())
        })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let stored = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &stored).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let stored = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &stored).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_record() {
        let err = verify_password("anything", "not-a-composite-credential").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn composite_is_hex_salt_dot_hex_hash() {
        let stored = hash_password("hunter2").expect("hashing should succeed");
        let (salt, hash) = stored.split_once('.').expect("exactly one separator");
        assert_eq!(salt.len(), SALT_LEN * 2);
        assert_eq!(hash.len(), HASH_LEN * 2);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let a = hash_password("hunter2").expect("hashing should succeed");
        let b = hash_password("hunter2").expect("hashing should succeed");
        assert_ne!(a, b);
    }
}
