//! Cryptographic operations for the archive format.
//!
//! This module implements the cipher layer of the `.rayconfig` format using
//! RustCrypto building blocks:
//! - **SHA-256** (two chained rounds) for key and IV derivation
//! - **AES-256-CBC** with PKCS#7 padding for the payload
//!
//! ## Security Model
//!
//! The format is a compatibility contract, not a modern design:
//! - Key and IV are derived from the passphrase alone, with no salt and no
//!   work factor, so offline brute-force of weak passphrases is cheap.
//! - There is no authentication tag. Tampering is only detected indirectly,
//!   when the decrypted payload fails to decompress or parse.
//! - A random 16-byte header prepended to every plaintext is the only source
//!   of ciphertext variation between encryptions with the same passphrase.
//!
//! We implement it bit-for-bit anyway because interoperating with existing
//! archives is the whole point. Key material is still zeroized on drop and
//! never cached.

pub mod cipher;
pub mod key;

pub use cipher::{decrypt, encrypt};
pub use key::{derive_key_material, KeyMaterial};
