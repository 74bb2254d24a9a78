use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// PBKDF2 rounds; tens of milliseconds per hash on a release build.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

const SALT_BYTES: usize = 32;
const DIGEST_BYTES: usize = 32;

/// Hash `plain` with PBKDF2-HMAC-SHA256 and return `(hash_hex, salt)`.
///
/// A fresh 32-byte hex salt is generated when `salt` is `None`. The salt
/// string's bytes are fed to PBKDF2 as-is, so stored salts are reusable
/// without decoding.
pub fn hash_password(plain: &str, salt: Option<&str>) -> (String, String) {
    let salt = match salt {
        Some(s) => s.to_owned(),
        None => generate_salt(),
    };
    let mut digest = [0u8; DIGEST_BYTES];
    pbkdf2_hmac::<Sha256>(plain.as_bytes(), salt.as_bytes(), PBKDF2_ITERATIONS, &mut digest);
    (hex::encode(digest), salt)
}

/// Recompute the hash with the stored salt and compare in constant time.
pub fn verify_password(plain: &str, hash_hex: &str, salt: &str) -> bool {
    let (computed, _) = hash_password(plain, Some(salt));
    computed.as_bytes().ct_eq(hash_hex.as_bytes()).into()
}

fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
