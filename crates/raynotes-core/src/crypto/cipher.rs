//! AES-256-CBC payload cipher.
//!
//! This module encrypts and decrypts the compressed payload of an archive.
//! The plaintext handed to [`encrypt`] is always prefixed with 16 random
//! bytes before padding; [`decrypt`] strips that prefix after removing the
//! padding. Other implementations of the format rely on both behaviors, so
//! the layout is fixed:
//!
//! ```text
//! ciphertext = AES-256-CBC( key, iv, pkcs7( random_header[16] || payload ) )
//! ```

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::key::derive_key_material;
use crate::error::{RayError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block length in bytes.
pub const BLOCK_LENGTH: usize = 16;

/// Length of the random header prepended to every plaintext.
pub const HEADER_LENGTH: usize = 16;

/// Encrypt a payload for a passphrase.
///
/// Prepends a fresh random 16-byte header, applies PKCS#7 padding, and
/// encrypts with AES-256-CBC under the key material derived from the
/// passphrase. The random header is what makes repeated encryptions of the
/// same payload produce different ciphertexts despite the deterministic IV.
///
/// # Arguments
///
/// * `data` - The payload to encrypt (normally the compressed config)
/// * `passphrase` - The passphrase for encryption
///
/// # Examples
///
/// ```
/// use raynotes_core::crypto::cipher::encrypt;
///
/// let sealed = encrypt(b"payload bytes", "my-passphrase");
/// assert_eq!(sealed.len() % 16, 0);
/// ```
pub fn encrypt(data: &[u8], passphrase: &str) -> Vec<u8> {
    let material = derive_key_material(passphrase);

    let mut header = [0u8; HEADER_LENGTH];
    OsRng.fill_bytes(&mut header);

    let mut plaintext = Vec::with_capacity(HEADER_LENGTH + data.len());
    plaintext.extend_from_slice(&header);
    plaintext.extend_from_slice(data);

    Aes256CbcEnc::new(material.key().into(), material.iv().into())
        .encrypt_padded_vec_mut::<Pkcs7>(&plaintext)
}

/// Decrypt a payload with a passphrase.
///
/// Reverses [`encrypt`]: decrypts with AES-256-CBC, strips the padding, and
/// discards the 16-byte random header.
///
/// Padding removal is deliberately lenient. Only the final byte is read as
/// the padding length; the filler bytes are not verified. Archives written
/// by other tools depend on that leniency.
///
/// # Arguments
///
/// * `encrypted_data` - The ciphertext to decrypt
/// * `passphrase` - The passphrase for decryption
///
/// # Errors
///
/// Returns `RayError::MalformedCiphertext` if the input is not a whole
/// number of blocks or too short to contain the header, and
/// `RayError::InvalidPadding` if the recovered padding length is zero or
/// exceeds the plaintext.
///
/// A wrong passphrase is usually, but not always, caught here as an
/// `InvalidPadding` failure. Garbage plaintext can carry a plausible
/// padding byte by chance, so callers must not treat success at this layer
/// as proof the passphrase was right; the decompression and parse stages
/// above provide that check.
///
/// # Examples
///
/// ```
/// use raynotes_core::crypto::cipher::{decrypt, encrypt};
///
/// let sealed = encrypt(b"payload bytes", "my-passphrase");
/// let opened = decrypt(&sealed, "my-passphrase").unwrap();
/// assert_eq!(opened.as_slice(), b"payload bytes");
/// ```
pub fn decrypt(encrypted_data: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    if encrypted_data.is_empty() || encrypted_data.len() % BLOCK_LENGTH != 0 {
        return Err(RayError::MalformedCiphertext);
    }

    let material = derive_key_material(passphrase);

    let mut buf = encrypted_data.to_vec();
    Aes256CbcDec::new(material.key().into(), material.iv().into())
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| RayError::MalformedCiphertext)?;

    // Only the final byte counts; filler bytes are not checked.
    let padding = match buf.last() {
        Some(&byte) => byte as usize,
        None => return Err(RayError::InvalidPadding),
    };
    if padding == 0 || padding > buf.len() {
        return Err(RayError::InvalidPadding);
    }
    buf.truncate(buf.len() - padding);

    if buf.len() < HEADER_LENGTH {
        return Err(RayError::MalformedCiphertext);
    }
    Ok(buf.split_off(HEADER_LENGTH))
}
