//! Key and IV derivation from a passphrase.
//!
//! The archive format derives both the AES key and the CBC IV from the
//! passphrase alone, using two chained rounds of SHA-256:
//!
//! ```text
//! digest1 = SHA-256(passphrase)
//! digest2 = SHA-256(digest1 || passphrase)
//! key = digest1            (32 bytes)
//! iv  = digest2[..16]      (16 bytes)
//! ```
//!
//! There is no salt and no work factor, so identical passphrases always
//! yield identical key material. That is a deliberate compatibility
//! requirement of the on-disk format, not a scheme to imitate elsewhere:
//! it gives none of the brute-force resistance of a real KDF. What little
//! randomization the format has comes from the random 16-byte header
//! prepended to every plaintext before encryption (see [`crate::crypto::cipher`]).

use sha2::{Digest, Sha256};
use zeroize::ZeroizeOnDrop;

/// Length of the AES-256 key in bytes.
pub const KEY_LENGTH: usize = 32;

/// Length of the CBC initialization vector in bytes.
pub const IV_LENGTH: usize = 16;

/// Key and IV derived from a passphrase.
///
/// This type ensures that key material is securely zeroized from memory
/// when dropped, reducing the window of exposure. Derive it immediately
/// before an encryption or decryption operation and let it drop right
/// after; never cache it.
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyMaterial {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
    /// The raw IV bytes (zeroized on drop)
    iv: [u8; IV_LENGTH],
}

impl KeyMaterial {
    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate cipher operations.
    pub fn key(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Get a reference to the raw IV bytes.
    pub fn iv(&self) -> &[u8; IV_LENGTH] {
        &self.iv
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

/// Derive the AES-256 key and CBC IV for a passphrase.
///
/// Deterministic: the same passphrase bytes always produce the same
/// material, which is what lets independently written tools open each
/// other's archives.
///
/// # Arguments
///
/// * `passphrase` - The passphrase to derive from (empty is allowed;
///   the format does not forbid it)
pub fn derive_key_material(passphrase: &str) -> KeyMaterial {
    let digest1 = Sha256::digest(passphrase.as_bytes());

    let mut second = Sha256::new();
    second.update(digest1);
    second.update(passphrase.as_bytes());
    let digest2 = second.finalize();

    let mut key = [0u8; KEY_LENGTH];
    let mut iv = [0u8; IV_LENGTH];
    key.copy_from_slice(&digest1);
    iv.copy_from_slice(&digest2[..IV_LENGTH]);

    KeyMaterial { key, iv }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_deterministic() {
        let material1 = derive_key_material("test-passphrase");
        let material2 = derive_key_material("test-passphrase");

        // Same passphrase should produce identical material
        assert_eq!(material1.key(), material2.key());
        assert_eq!(material1.iv(), material2.iv());
    }

    #[test]
    fn test_different_passphrase_different_material() {
        let material1 = derive_key_material("passphrase-one");
        let material2 = derive_key_material("passphrase-two");

        assert_ne!(material1.key(), material2.key());
        assert_ne!(material1.iv(), material2.iv());
    }

    #[test]
    fn test_known_vectors() {
        // Precomputed with an independent SHA-256 implementation.
        let material = derive_key_material("password");
        assert_eq!(
            hex::encode(material.key()),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        assert_eq!(hex::encode(material.iv()), "3b02902846ffd32e92ff168b3f5d16b0");

        let material = derive_key_material("correct horse battery staple");
        assert_eq!(
            hex::encode(material.key()),
            "c4bbcb1fbec99d65bf59d85c8cb62ee2db963f0fe106f483d9afa73bd4e39a8a"
        );
        assert_eq!(hex::encode(material.iv()), "f3cea0462abb0f91c886be49ec5f13d5");
    }

    #[test]
    fn test_empty_passphrase_derivable() {
        // The format does not reject empty passphrases; the key is just
        // SHA-256 of the empty string.
        let material = derive_key_material("");
        assert_eq!(
            hex::encode(material.key()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(hex::encode(material.iv()), "5df6e0e2761359d30a8275058e299fcc");
    }

    #[test]
    fn test_material_lengths() {
        let material = derive_key_material("test-passphrase");
        assert_eq!(material.key().len(), KEY_LENGTH);
        assert_eq!(material.iv().len(), IV_LENGTH);
    }

    #[test]
    fn test_key_material_debug_redacts() {
        let material = derive_key_material("test-passphrase");

        let debug_output = format!("{:?}", material);
        assert!(debug_output.contains("REDACTED"));

        // Should NOT contain actual key bytes
        let key_hex = hex::encode(&material.key()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
